//! Framebuffer-config scoring.
//!
//! GLX hands back every config matching the required attribute list; the
//! window picks one by multisampling quality. The scan is kept free of any
//! X11 types so the selection rules are unit-testable.

/// Multisampling attributes of one framebuffer config, in list order.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Candidate {
    /// `GLX_SAMPLE_BUFFERS` — nonzero when the config is multisample-capable.
    pub sample_buffers: i32,
    /// `GLX_SAMPLES` — samples per pixel.
    pub samples: i32,
}

/// How the best config is chosen.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum BestConfigPolicy {
    /// Historical behavior: the first candidate is accepted unconditionally,
    /// and a later candidate replaces it only when it has sample buffers and
    /// a strictly greater sample count. A non-multisampled first entry can
    /// therefore win over an equally-sampled multisampled one.
    #[default]
    FirstThenStrictlyBetter,
    /// Maximum sample count among multisampled candidates; falls back to the
    /// first candidate when none are multisampled.
    MultisampledOnly,
}

/// Returns the index of the best candidate, or `None` for an empty list.
pub fn pick_best(candidates: &[Candidate], policy: BestConfigPolicy) -> Option<usize> {
    match policy {
        BestConfigPolicy::FirstThenStrictlyBetter => {
            let mut best: Option<usize> = None;
            let mut best_samples = -1;

            for (index, c) in candidates.iter().enumerate() {
                if best.is_none() || (c.sample_buffers != 0 && c.samples > best_samples) {
                    best = Some(index);
                    best_samples = c.samples;
                }
            }

            best
        }
        BestConfigPolicy::MultisampledOnly => candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.sample_buffers != 0)
            .max_by_key(|(_, c)| c.samples)
            .map(|(index, _)| index)
            .or(if candidates.is_empty() { None } else { Some(0) }),
    }
}

/// Returns the index of the worst candidate, or `None` for an empty list.
///
/// The result is only ever logged; it mirrors the best scan for diagnostic
/// symmetry. Any non-multisampled candidate displaces the current worst.
pub fn pick_worst(candidates: &[Candidate]) -> Option<usize> {
    let mut worst: Option<usize> = None;
    let mut worst_samples = 999;

    for (index, c) in candidates.iter().enumerate() {
        if worst.is_none() || c.sample_buffers == 0 || c.samples < worst_samples {
            worst = Some(index);
            worst_samples = c.samples;
        }
    }

    worst
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(sample_buffers: i32, samples: i32) -> Candidate {
        Candidate {
            sample_buffers,
            samples,
        }
    }

    // ── pick_best, historical policy ──────────────────────────────────────

    #[test]
    fn best_empty_list_is_none() {
        assert_eq!(pick_best(&[], BestConfigPolicy::default()), None);
    }

    #[test]
    fn best_prefers_max_samples_among_multisampled() {
        let list = [c(1, 2), c(1, 8), c(1, 4)];
        assert_eq!(pick_best(&list, BestConfigPolicy::default()), Some(1));
    }

    #[test]
    fn best_accepts_non_multisampled_first_entry() {
        // The first candidate is taken as the initial best even with
        // sample_buffers == 0.
        let list = [c(0, 0)];
        assert_eq!(pick_best(&list, BestConfigPolicy::default()), Some(0));
    }

    #[test]
    fn best_first_entry_survives_equal_sample_count() {
        // A later multisampled candidate must be strictly better than the
        // first entry's sample count to replace it.
        let list = [c(0, 4), c(1, 4)];
        assert_eq!(pick_best(&list, BestConfigPolicy::default()), Some(0));
    }

    #[test]
    fn best_first_entry_replaced_by_strictly_better() {
        let list = [c(0, 0), c(1, 4)];
        assert_eq!(pick_best(&list, BestConfigPolicy::default()), Some(1));
    }

    #[test]
    fn best_ties_break_to_first_seen() {
        let list = [c(1, 4), c(1, 4)];
        assert_eq!(pick_best(&list, BestConfigPolicy::default()), Some(0));
    }

    // ── pick_best, corrected policy ───────────────────────────────────────

    #[test]
    fn strict_policy_skips_non_multisampled_first_entry() {
        let list = [c(0, 4), c(1, 4)];
        assert_eq!(pick_best(&list, BestConfigPolicy::MultisampledOnly), Some(1));
    }

    #[test]
    fn strict_policy_falls_back_to_first_when_none_multisampled() {
        let list = [c(0, 0), c(0, 0)];
        assert_eq!(pick_best(&list, BestConfigPolicy::MultisampledOnly), Some(0));
    }

    // ── pick_worst ────────────────────────────────────────────────────────

    #[test]
    fn worst_empty_list_is_none() {
        assert_eq!(pick_worst(&[]), None);
    }

    #[test]
    fn worst_prefers_min_samples() {
        let list = [c(1, 8), c(1, 2), c(1, 4)];
        assert_eq!(pick_worst(&list), Some(1));
    }

    #[test]
    fn worst_any_non_multisampled_displaces() {
        let list = [c(1, 2), c(0, 16)];
        assert_eq!(pick_worst(&list), Some(1));
    }
}
