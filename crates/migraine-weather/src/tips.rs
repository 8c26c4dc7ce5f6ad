//! Static tip catalog and the dashboard's tip of the day.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::risk::RiskLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TipCategory {
    Prevention,
    Relief,
    Lifestyle,
    Tracking,
}

impl TipCategory {
    pub const ALL: [TipCategory; 4] = [
        TipCategory::Prevention,
        TipCategory::Relief,
        TipCategory::Lifestyle,
        TipCategory::Tracking,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TipCategory::Prevention => "Prevention",
            TipCategory::Relief => "Relief",
            TipCategory::Lifestyle => "Lifestyle",
            TipCategory::Tracking => "Tracking",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tip {
    pub title: &'static str,
    pub description: &'static str,
    pub category: TipCategory,
}

const fn tip(title: &'static str, description: &'static str, category: TipCategory) -> Tip {
    Tip {
        title,
        description,
        category,
    }
}

static TIPS: [Tip; 12] = [
    tip(
        "Stay Hydrated",
        "Drink at least 8 glasses of water daily. Dehydration is a common migraine trigger.",
        TipCategory::Prevention,
    ),
    tip(
        "Regular Sleep Schedule",
        "Go to bed and wake up at the same time every day, even on weekends.",
        TipCategory::Prevention,
    ),
    tip(
        "Cold Compress",
        "Apply a cold compress to your forehead or neck for 15-20 minutes during a migraine.",
        TipCategory::Relief,
    ),
    tip(
        "Dark, Quiet Room",
        "Rest in a dark, quiet room when experiencing a migraine to reduce sensory triggers.",
        TipCategory::Relief,
    ),
    tip(
        "Regular Meals",
        "Don't skip meals. Low blood sugar can trigger migraines. Eat balanced meals every 3-4 hours.",
        TipCategory::Prevention,
    ),
    tip(
        "Limit Screen Time",
        "Take regular breaks from screens and use blue light filters, especially in the evening.",
        TipCategory::Prevention,
    ),
    tip(
        "Gentle Massage",
        "Massage your temples, neck, and shoulders to help relieve tension and pain.",
        TipCategory::Relief,
    ),
    tip(
        "Stress Management",
        "Practice relaxation techniques like deep breathing, meditation, or yoga daily.",
        TipCategory::Lifestyle,
    ),
    tip(
        "Track Your Triggers",
        "Keep a detailed migraine diary to identify patterns and personal triggers.",
        TipCategory::Tracking,
    ),
    tip(
        "Regular Exercise",
        "Gentle, regular exercise like walking or swimming can help prevent migraines.",
        TipCategory::Lifestyle,
    ),
    tip(
        "Weather Awareness",
        "Track weather patterns. Changes in barometric pressure can trigger migraines.",
        TipCategory::Tracking,
    ),
    tip(
        "Aromatherapy",
        "Peppermint or lavender essential oils may help reduce migraine intensity.",
        TipCategory::Relief,
    ),
];

/// The full catalog, in display order
pub fn tips() -> &'static [Tip] {
    &TIPS
}

pub fn tips_in(category: TipCategory) -> Vec<&'static Tip> {
    TIPS.iter().filter(|t| t.category == category).collect()
}

/// Categories the tip of the day is drawn from at a given risk level
fn categories_for(level: RiskLevel) -> &'static [TipCategory] {
    match level {
        RiskLevel::High | RiskLevel::VeryHigh => &[TipCategory::Relief],
        RiskLevel::Moderate | RiskLevel::Elevated => &[TipCategory::Prevention],
        RiskLevel::VeryLow | RiskLevel::Low => &[TipCategory::Lifestyle, TipCategory::Tracking],
    }
}

/// Pick the tip shown on the dashboard.
///
/// Deterministic: the same date and level always select the same tip, and
/// the selection rotates through the pool day by day.
pub fn tip_of_the_day(date: NaiveDate, level: RiskLevel) -> &'static Tip {
    let categories = categories_for(level);
    let pool: Vec<&'static Tip> = TIPS
        .iter()
        .filter(|t| categories.contains(&t.category))
        .collect();

    (date.ordinal0() as usize)
        .checked_rem(pool.len())
        .and_then(|i| pool.get(i).copied())
        .unwrap_or(&TIPS[0])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_catalog_covers_every_category() {
        assert_eq!(tips().len(), 12);
        for category in TipCategory::ALL {
            assert!(!tips_in(category).is_empty(), "{} has no tips", category.name());
        }
    }

    #[test]
    fn test_tips_in_filters() {
        let relief = tips_in(TipCategory::Relief);
        assert_eq!(relief.len(), 4);
        assert!(relief.iter().all(|t| t.category == TipCategory::Relief));
        assert_eq!(relief[0].title, "Cold Compress");
    }

    #[test]
    fn test_tip_of_the_day_is_deterministic() {
        let d = date(2025, 3, 14);
        assert_eq!(
            tip_of_the_day(d, RiskLevel::Moderate),
            tip_of_the_day(d, RiskLevel::Moderate)
        );
    }

    #[test]
    fn test_tip_of_the_day_follows_risk_level() {
        let d = date(2025, 7, 2);
        assert_eq!(tip_of_the_day(d, RiskLevel::VeryHigh).category, TipCategory::Relief);
        assert_eq!(tip_of_the_day(d, RiskLevel::High).category, TipCategory::Relief);
        assert_eq!(tip_of_the_day(d, RiskLevel::Elevated).category, TipCategory::Prevention);
        assert!(matches!(
            tip_of_the_day(d, RiskLevel::VeryLow).category,
            TipCategory::Lifestyle | TipCategory::Tracking
        ));
    }

    #[test]
    fn test_tip_of_the_day_rotates_daily() {
        // Jan 1 is ordinal 0, Jan 2 ordinal 1
        assert_eq!(tip_of_the_day(date(2025, 1, 1), RiskLevel::High).title, "Cold Compress");
        assert_eq!(tip_of_the_day(date(2025, 1, 2), RiskLevel::High).title, "Dark, Quiet Room");
        // Pool of four wraps on the fifth day
        assert_eq!(tip_of_the_day(date(2025, 1, 5), RiskLevel::High).title, "Cold Compress");
    }
}
