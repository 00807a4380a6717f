//! Presentation helpers for a happiness score: mood buckets and meter colour.

use image::Rgb;
use serde::Serialize;

use crate::score::HappinessScore;

/// Coarse mood bucket for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// 0..20
    Sad,
    /// 20..40
    Neutral,
    /// 40..60
    Content,
    /// 60..80
    Happy,
    /// 80..=100
    Joyful,
}

impl Mood {
    pub fn from_score(score: HappinessScore) -> Self {
        match score.value() {
            0..=19 => Mood::Sad,
            20..=39 => Mood::Neutral,
            40..=59 => Mood::Content,
            60..=79 => Mood::Happy,
            _ => Mood::Joyful,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Sad => "😔",
            Mood::Neutral => "😐",
            Mood::Content => "🙂",
            Mood::Happy => "😊",
            Mood::Joyful => "😁",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Sad => "sad",
            Mood::Neutral => "neutral",
            Mood::Content => "content",
            Mood::Happy => "happy",
            Mood::Joyful => "joyful",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl HappinessScore {
    pub fn mood(&self) -> Mood {
        Mood::from_score(*self)
    }
}

/// Meter fill colour: red at 0, yellow at 50, green at 100.
pub fn meter_color(score: HappinessScore) -> Rgb<u8> {
    let value = score.value() as f32;
    if value < 50.0 {
        let g = ((value / 50.0) * 255.0).round() as u8;
        Rgb([255, g, 0])
    } else {
        let r = ((1.0 - (value - 50.0) / 50.0) * 255.0).round() as u8;
        Rgb([r, 255, 0])
    }
}
