use crate::core::models::Buyer;
use chrono::NaiveDate;

#[derive(Clone, Debug, PartialEq)]
pub struct BuyerMetrics {
    pub buyer: Buyer,
    pub current: Option<i16>,
    pub delta: Option<i32>,
}

/// Snapshot of the last completed week against the one before it.
#[derive(Clone, Debug, PartialEq)]
pub struct WeeklyMetrics {
    pub target_week: i32,
    pub prev_week: i32,
    pub current_date: Option<NaiveDate>,
    pub current_delta_date: String,
    pub buyers: Vec<BuyerMetrics>,
    pub ttl_trg_w: Option<i16>,
    pub ttl_pr_w: Option<i16>,
    pub total_delta_prev: Option<i32>,
    pub total_delta_median: Option<f64>,
}

impl WeeklyMetrics {
    pub fn buyer(&self, buyer: Buyer) -> Option<&BuyerMetrics> {
        self.buyers.iter().find(|m| m.buyer == buyer)
    }

    /// Target week date as shown to users, `dd.mm.yyyy`.
    pub fn display_date(&self) -> Option<String> {
        self.current_date.map(|d| d.format("%d.%m.%Y").to_string())
    }
}

#[derive(Clone, Debug)]
pub struct WeeklyReport {
    pub chart_png: Vec<u8>,
    pub metrics: WeeklyMetrics,
}

#[derive(Clone, Debug)]
pub struct ComparisonReport {
    pub chart_png: Vec<u8>,
    pub years: Vec<u16>,
    pub omitted_years: Vec<u16>,
}
