use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct YearComparisonRecord {
    pub iso_week: Option<i16>,
    pub values: BTreeMap<u16, Option<i16>>,
}

impl YearComparisonRecord {
    pub fn value(&self, year: u16) -> Option<i16> {
        self.values.get(&year).copied().flatten()
    }
}

/// Cleaned multi-year table.
///
/// `years` holds the tracked years present in the export, oldest first.
/// Years configured but absent from the export end up in `missing_years`.
#[derive(Clone, Debug, Default)]
pub struct YearComparisonTable {
    years: Vec<u16>,
    missing_years: Vec<u16>,
    week_column_missing: bool,
    records: Vec<YearComparisonRecord>,
}

impl YearComparisonTable {
    pub fn new(
        years: Vec<u16>,
        missing_years: Vec<u16>,
        week_column_missing: bool,
        records: Vec<YearComparisonRecord>,
    ) -> Self {
        Self { years, missing_years, week_column_missing, records }
    }

    pub fn years(&self) -> &[u16] {
        &self.years
    }

    pub fn missing_years(&self) -> &[u16] {
        &self.missing_years
    }

    pub fn week_column_missing(&self) -> bool {
        self.week_column_missing
    }

    pub fn records(&self) -> &[YearComparisonRecord] {
        &self.records
    }

    pub fn weeks(&self) -> Vec<Option<i16>> {
        self.records.iter().map(|r| r.iso_week).collect()
    }

    /// Values of one year in row order, or `None` if the year is not in the table.
    pub fn series(&self, year: u16) -> Option<Vec<Option<i16>>> {
        if !self.years.contains(&year) {
            return None;
        }
        Some(self.records.iter().map(|r| r.value(year)).collect())
    }
}
