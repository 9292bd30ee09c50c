use chrono::NaiveDate;
use std::fmt;

/// Columns of the current-year sheet, in the order they are selected from the export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeeklyColumn {
    DeltaDate,
    Week,
    Safonov,
    Grushin,
    Katishev,
    TotalForWeek,
}

impl WeeklyColumn {
    pub const ALL: [WeeklyColumn; 6] = [
        WeeklyColumn::DeltaDate,
        WeeklyColumn::Week,
        WeeklyColumn::Safonov,
        WeeklyColumn::Grushin,
        WeeklyColumn::Katishev,
        WeeklyColumn::TotalForWeek,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WeeklyColumn::DeltaDate => "delta_date",
            WeeklyColumn::Week => "week",
            WeeklyColumn::Safonov => "Safonov",
            WeeklyColumn::Grushin => "Grushin",
            WeeklyColumn::Katishev => "Katishev",
            WeeklyColumn::TotalForWeek => "total_for_week",
        }
    }
}

impl fmt::Display for WeeklyColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The three procurement agents tracked per week.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Buyer {
    Safonov,
    Grushin,
    Katishev,
}

impl Buyer {
    pub const ALL: [Buyer; 3] = [Buyer::Safonov, Buyer::Grushin, Buyer::Katishev];

    pub fn column(&self) -> WeeklyColumn {
        match self {
            Buyer::Safonov => WeeklyColumn::Safonov,
            Buyer::Grushin => WeeklyColumn::Grushin,
            Buyer::Katishev => WeeklyColumn::Katishev,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Buyer::Safonov => "Сафонов",
            Buyer::Grushin => "Грушин",
            Buyer::Katishev => "Катышев",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeeklyRecord {
    pub delta_date: String,
    pub iso_week: Option<i16>,
    pub safonov: Option<i16>,
    pub grushin: Option<i16>,
    pub katishev: Option<i16>,
    pub total_for_week: Option<i16>,
    pub date: Option<NaiveDate>,
}

impl WeeklyRecord {
    pub fn volume(&self, buyer: Buyer) -> Option<i16> {
        match buyer {
            Buyer::Safonov => self.safonov,
            Buyer::Grushin => self.grushin,
            Buyer::Katishev => self.katishev,
        }
    }
}

/// Cleaned current-year table. Rows keep their sheet order.
#[derive(Clone, Debug, Default)]
pub struct WeeklyTable {
    records: Vec<WeeklyRecord>,
    missing_columns: Vec<WeeklyColumn>,
}

impl WeeklyTable {
    pub fn new(records: Vec<WeeklyRecord>, missing_columns: Vec<WeeklyColumn>) -> Self {
        Self { records, missing_columns }
    }

    pub fn records(&self) -> &[WeeklyRecord] {
        &self.records
    }

    pub fn missing_columns(&self) -> &[WeeklyColumn] {
        &self.missing_columns
    }

    pub fn has_column(&self, column: WeeklyColumn) -> bool {
        !self.missing_columns.contains(&column)
    }

    /// First row (lowest index) recorded for `week`. Later duplicates are ignored.
    pub fn find_week(&self, week: i32) -> Option<&WeeklyRecord> {
        self.records
            .iter()
            .find(|record| record.iso_week.map(i32::from) == Some(week))
    }
}
