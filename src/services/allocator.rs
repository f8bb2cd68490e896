use crate::models::domain::DifficultyDistribution;

/// Historical per-tier correct rates, each in [0, 1] when present.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerformanceRates {
    pub easy_rate: Option<f64>,
    pub medium_rate: Option<f64>,
    pub hard_rate: Option<f64>,
}

pub struct DifficultyAllocator;

impl DifficultyAllocator {
    /// Decide how many easy/medium/hard questions a new quiz should
    /// contain. Baseline split is 50/30/20; the hard count absorbs the
    /// rounding remainder and easy is recomputed last, so the three
    /// always sum exactly to `total_questions`. A supplied history
    /// nudges hard and then medium by at most one question each.
    pub fn allocate(
        total_questions: i32,
        past_performance: Option<PerformanceRates>,
    ) -> DifficultyDistribution {
        let total = total_questions.max(1);
        let total_f = total as f64;

        let easy = (total_f * 0.5).round() as i32;
        let mut medium = (total_f * 0.3).round() as i32;
        let mut hard = total - easy - medium;

        if let Some(rates) = past_performance {
            if let Some(hard_rate) = rates.hard_rate.map(clamp_rate) {
                if hard_rate < 0.5 {
                    hard -= 1;
                } else if hard_rate > 0.8 {
                    hard += 1;
                }
            }
            hard = hard.clamp(0, total);

            if let Some(medium_rate) = rates.medium_rate.map(clamp_rate) {
                if medium_rate < 0.5 {
                    medium -= 1;
                } else if medium_rate > 0.8 {
                    medium += 1;
                }
            }
            medium = medium.clamp(0, total - hard);
        } else {
            hard = hard.clamp(0, total);
            medium = medium.clamp(0, total - hard);
        }

        DifficultyDistribution {
            easy: total - medium - hard,
            medium,
            hard,
        }
    }
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        return 0.0;
    }
    rate.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates(easy: f64, medium: f64, hard: f64) -> PerformanceRates {
        PerformanceRates {
            easy_rate: Some(easy),
            medium_rate: Some(medium),
            hard_rate: Some(hard),
        }
    }

    #[test]
    fn baseline_split_for_ten_questions() {
        let mix = DifficultyAllocator::allocate(10, None);
        assert_eq!(mix.easy, 5);
        assert_eq!(mix.medium, 3);
        assert_eq!(mix.hard, 2);
    }

    #[test]
    fn counts_always_sum_to_total() {
        for total in 1..=50 {
            let mix = DifficultyAllocator::allocate(total, None);
            assert_eq!(mix.total(), total, "baseline mismatch at {}", total);
            assert!(mix.easy >= 0 && mix.medium >= 0 && mix.hard >= 0);

            let nudged = DifficultyAllocator::allocate(total, Some(rates(0.2, 0.2, 0.2)));
            assert_eq!(nudged.total(), total, "nudged mismatch at {}", total);
            assert!(nudged.easy >= 0 && nudged.medium >= 0 && nudged.hard >= 0);
        }
    }

    #[test]
    fn weak_hard_rate_sheds_one_hard_question() {
        let baseline = DifficultyAllocator::allocate(10, None);
        let mix = DifficultyAllocator::allocate(10, Some(rates(0.9, 0.9, 0.4)));
        assert_eq!(mix.hard, baseline.hard - 1);
    }

    #[test]
    fn strong_hard_rate_adds_one_hard_question() {
        let baseline = DifficultyAllocator::allocate(10, None);
        let mix = DifficultyAllocator::allocate(
            10,
            Some(PerformanceRates {
                hard_rate: Some(0.9),
                ..Default::default()
            }),
        );
        assert_eq!(mix.hard, (baseline.hard + 1).min(10));
        assert_eq!(mix.total(), 10);
    }

    #[test]
    fn hard_count_never_goes_negative() {
        // total=1 baseline has zero hard questions
        let mix = DifficultyAllocator::allocate(1, Some(rates(0.1, 0.1, 0.1)));
        assert_eq!(mix.hard, 0);
        assert_eq!(mix.total(), 1);
    }

    #[test]
    fn middling_rates_leave_baseline_untouched() {
        let baseline = DifficultyAllocator::allocate(10, None);
        let mix = DifficultyAllocator::allocate(10, Some(rates(0.6, 0.6, 0.6)));
        assert_eq!(mix, baseline);
    }

    #[test]
    fn out_of_range_rates_are_clamped() {
        let mix = DifficultyAllocator::allocate(10, Some(rates(2.0, 7.3, 9.9)));
        // 9.9 clamps to 1.0, which is > 0.8: one extra hard question
        assert_eq!(mix.hard, 3);
        assert_eq!(mix.total(), 10);

        let mix = DifficultyAllocator::allocate(10, Some(rates(-1.0, -0.5, -2.0)));
        // negative rates clamp to 0.0, shedding a hard and a medium
        assert_eq!(mix.hard, 1);
        assert_eq!(mix.medium, 2);
        assert_eq!(mix.total(), 10);
    }

    #[test]
    fn absent_rates_are_ignored() {
        let baseline = DifficultyAllocator::allocate(10, None);
        let mix = DifficultyAllocator::allocate(10, Some(PerformanceRates::default()));
        assert_eq!(mix, baseline);
    }
}
