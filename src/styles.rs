//! Style-selection axes and composite-key construction.
//!
//! A style is never picked directly: the user ticks tones and viewpoints
//! (plus optional report formats) and every tone x viewpoint pair becomes
//! one flat composite key such as `formal_tech`. The backend accepts these
//! keys as-is and echoes a display label per key, so key order has to be
//! stable for results to line up with UI labels by position.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Formal,
    Concise,
    Detailed,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Formal, Tone::Concise, Tone::Detailed];

    pub fn key(self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Concise => "concise",
            Tone::Detailed => "detailed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tone::Formal => "Formal",
            Tone::Concise => "Concise",
            Tone::Detailed => "Detailed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Viewpoint {
    Tech,
    Business,
    Management,
}

impl Viewpoint {
    pub const ALL: [Viewpoint; 3] = [Viewpoint::Tech, Viewpoint::Business, Viewpoint::Management];

    pub fn key(self) -> &'static str {
        match self {
            Viewpoint::Tech => "tech",
            Viewpoint::Business => "business",
            Viewpoint::Management => "management",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Viewpoint::Tech => "Technical",
            Viewpoint::Business => "Business",
            Viewpoint::Management => "Management",
        }
    }
}

/// Standalone report-format add-ons. These are complete keys on their own,
/// not combined with the other axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Daily,
    Weekly,
    Monthly,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] =
        [ReportFormat::Daily, ReportFormat::Weekly, ReportFormat::Monthly];

    pub fn key(self) -> &'static str {
        match self {
            ReportFormat::Daily => "daily_report",
            ReportFormat::Weekly => "weekly_report",
            ReportFormat::Monthly => "monthly_report",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportFormat::Daily => "Daily report",
            ReportFormat::Weekly => "Weekly report",
            ReportFormat::Monthly => "Monthly report",
        }
    }
}

/// The axes a user has ticked. Membership is a set; `composite_keys` always
/// emits in the canonical axis order, never insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleSelection {
    tones: Vec<Tone>,
    viewpoints: Vec<Viewpoint>,
    report_formats: Vec<ReportFormat>,
}

impl StyleSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_axes(
        tones: &[Tone],
        viewpoints: &[Viewpoint],
        report_formats: &[ReportFormat],
    ) -> Self {
        let mut selection = Self::new();
        for &tone in tones {
            selection.select_tone(tone);
        }
        for &viewpoint in viewpoints {
            selection.select_viewpoint(viewpoint);
        }
        for &format in report_formats {
            selection.select_report_format(format);
        }
        selection
    }

    pub fn select_tone(&mut self, tone: Tone) {
        if !self.tones.contains(&tone) {
            self.tones.push(tone);
        }
    }

    pub fn select_viewpoint(&mut self, viewpoint: Viewpoint) {
        if !self.viewpoints.contains(&viewpoint) {
            self.viewpoints.push(viewpoint);
        }
    }

    pub fn select_report_format(&mut self, format: ReportFormat) {
        if !self.report_formats.contains(&format) {
            self.report_formats.push(format);
        }
    }

    pub fn is_empty(&self) -> bool {
        (self.tones.is_empty() || self.viewpoints.is_empty()) && self.report_formats.is_empty()
    }

    /// Flat composite keys: every selected tone x viewpoint pair first, then
    /// report-format add-ons. Iteration follows the canonical `ALL` orders,
    /// so the same ticks always produce the same sequence.
    pub fn composite_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for tone in Tone::ALL {
            if !self.tones.contains(&tone) {
                continue;
            }
            for viewpoint in Viewpoint::ALL {
                if !self.viewpoints.contains(&viewpoint) {
                    continue;
                }
                keys.push(format!("{}_{}", tone.key(), viewpoint.key()));
            }
        }
        for format in ReportFormat::ALL {
            if self.report_formats.contains(&format) {
                keys.push(format.key().to_string());
            }
        }
        keys
    }
}

/// One entry of the style catalog, shaped like the backend's `/api/styles`
/// payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleInfo {
    pub key: String,
    pub name: String,
}

static CATALOG: Lazy<Vec<StyleInfo>> = Lazy::new(|| {
    let everything =
        StyleSelection::from_axes(&Tone::ALL, &Viewpoint::ALL, &ReportFormat::ALL);
    everything
        .composite_keys()
        .into_iter()
        .map(|key| {
            let name = display_name(&key).expect("catalog key has a label").to_string();
            StyleInfo { key, name }
        })
        .collect()
});

/// The full style catalog in composite-key order.
pub fn catalog() -> &'static [StyleInfo] {
    &CATALOG
}

/// UI label for a composite key, `None` for unknown keys.
pub fn display_name(key: &str) -> Option<&'static str> {
    let name = match key {
        "formal_tech" => "Formal / Technical",
        "formal_business" => "Formal / Business",
        "formal_management" => "Formal / Management",
        "concise_tech" => "Concise / Technical",
        "concise_business" => "Concise / Business",
        "concise_management" => "Concise / Management",
        "detailed_tech" => "Detailed / Technical",
        "detailed_business" => "Detailed / Business",
        "detailed_management" => "Detailed / Management",
        "daily_report" => "Daily report",
        "weekly_report" => "Weekly report",
        "monthly_report" => "Monthly report",
        _ => return None,
    };
    Some(name)
}
