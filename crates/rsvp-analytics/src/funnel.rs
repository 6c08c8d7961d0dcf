//! Conversion funnel from invitation to response
//!
//! Stage percentages are relative to the first stage so they can be compared
//! directly. Dropoffs are pairwise between adjacent stages and always go
//! through [`calculate_dropoff`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rate::share_percent;

/// Identity of a funnel stage. Order of declaration is funnel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FunnelStageName {
    Invited,
    Opened,
    PageViewed,
    FormStarted,
    Responded,
}

impl FunnelStageName {
    /// Display label shown next to the stage
    pub fn label(self) -> &'static str {
        match self {
            FunnelStageName::Invited => "Invited",
            FunnelStageName::Opened => "Opened Invite",
            FunnelStageName::PageViewed => "Viewed Page",
            FunnelStageName::FormStarted => "Started RSVP",
            FunnelStageName::Responded => "Responded",
        }
    }

    /// Wire name, as serialized
    pub fn as_str(self) -> &'static str {
        match self {
            FunnelStageName::Invited => "invited",
            FunnelStageName::Opened => "opened",
            FunnelStageName::PageViewed => "pageViewed",
            FunnelStageName::FormStarted => "formStarted",
            FunnelStageName::Responded => "responded",
        }
    }
}

impl fmt::Display for FunnelStageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// invited -> opened -> responded
pub const STANDARD_STAGES: [FunnelStageName; 3] = [
    FunnelStageName::Invited,
    FunnelStageName::Opened,
    FunnelStageName::Responded,
];

/// invited -> opened -> page viewed -> form started -> responded
pub const EXTENDED_STAGES: [FunnelStageName; 5] = [
    FunnelStageName::Invited,
    FunnelStageName::Opened,
    FunnelStageName::PageViewed,
    FunnelStageName::FormStarted,
    FunnelStageName::Responded,
];

/// One step of the funnel with its count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelStage {
    pub name: FunnelStageName,
    pub label: String,
    pub count: u64,
    /// Relative to the first stage's count
    pub percentage: u32,
}

/// Loss between two adjacent stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelDropoff {
    pub from: FunnelStageName,
    pub to: FunnelStageName,
    pub lost: u64,
    pub rate: u32,
}

/// Ordered stages plus one dropoff per adjacent pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelData {
    pub stages: Vec<FunnelStage>,
    pub dropoffs: Vec<FunnelDropoff>,
    pub total_invited: u64,
    pub total_responded: u64,
    pub overall_conversion_rate: u32,
}

/// Counts for every stage of the extended funnel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelCounts {
    pub invited: u64,
    pub opened: u64,
    pub page_viewed: u64,
    pub form_started: u64,
    pub responded: u64,
}

impl FunnelCounts {
    pub fn count(&self, stage: FunnelStageName) -> u64 {
        match stage {
            FunnelStageName::Invited => self.invited,
            FunnelStageName::Opened => self.opened,
            FunnelStageName::PageViewed => self.page_viewed,
            FunnelStageName::FormStarted => self.form_started,
            FunnelStageName::Responded => self.responded,
        }
    }
}

/// Loss between two adjacent stages.
///
/// A later stage larger than the earlier one (racing counter updates) is
/// clamped to zero loss.
pub fn calculate_dropoff(
    from_count: u64,
    to_count: u64,
    from: FunnelStageName,
    to: FunnelStageName,
) -> FunnelDropoff {
    let lost = from_count.saturating_sub(to_count);
    FunnelDropoff {
        from,
        to,
        lost,
        rate: share_percent(lost, from_count),
    }
}

/// Build a funnel over an ordered list of `(stage, count)` pairs.
///
/// The first stage is 100% by definition. When it is zero, every later stage
/// reports 0% and every dropoff reports no loss: no data is not a loss.
pub fn build_funnel(stages: &[(FunnelStageName, u64)]) -> FunnelData {
    let base = stages.first().map(|&(_, count)| count).unwrap_or(0);

    let funnel_stages: Vec<FunnelStage> = stages
        .iter()
        .enumerate()
        .map(|(i, &(name, count))| FunnelStage {
            name,
            label: name.label().to_string(),
            count,
            percentage: if i == 0 { 100 } else { share_percent(count, base) },
        })
        .collect();

    let dropoffs = stages
        .windows(2)
        .map(|pair| {
            let (from, from_count) = pair[0];
            let (to, to_count) = pair[1];
            if base == 0 {
                calculate_dropoff(0, 0, from, to)
            } else {
                calculate_dropoff(from_count, to_count, from, to)
            }
        })
        .collect();

    let overall_conversion_rate = funnel_stages.last().map(|s| s.percentage).unwrap_or(0);

    FunnelData {
        total_invited: base,
        total_responded: stages.last().map(|&(_, count)| count).unwrap_or(0),
        overall_conversion_rate,
        stages: funnel_stages,
        dropoffs,
    }
}

/// Standard three-stage funnel: invited -> opened -> responded
pub fn build_funnel_data(total_invited: u64, total_opened: u64, total_responded: u64) -> FunnelData {
    let counts = FunnelCounts {
        invited: total_invited,
        opened: total_opened,
        responded: total_responded,
        ..FunnelCounts::default()
    };
    build_for(&STANDARD_STAGES, &counts)
}

/// Five-stage funnel including page views and started RSVP forms
pub fn build_extended_funnel_data(counts: &FunnelCounts) -> FunnelData {
    build_for(&EXTENDED_STAGES, counts)
}

fn build_for(order: &[FunnelStageName], counts: &FunnelCounts) -> FunnelData {
    let stages: Vec<(FunnelStageName, u64)> = order
        .iter()
        .map(|&stage| (stage, counts.count(stage)))
        .collect();
    build_funnel(&stages)
}
