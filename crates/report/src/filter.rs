use crate::record::SheetJson;

/// Allow-lists for the two categorical shared fields.
///
/// An empty list means "no restriction" for that field; records must match
/// both lists to survive.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Permitted 线别 (production line) values.
    pub lines: Vec<String>,
    /// Permitted 不良项 (defect type) values.
    pub defects: Vec<String>,
}

impl FilterCriteria {
    /// Restrict to the given line values.
    #[must_use]
    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict to the given defect values.
    #[must_use]
    pub fn with_defects<I, S>(mut self, defects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defects = defects.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the criteria restrict anything at all.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.lines.is_empty() && self.defects.is_empty()
    }
}

/// Filter every process's record list by the criteria.
///
/// Processes are filtered independently; the output keeps every process key
/// and the relative record order. A process whose records all fail the
/// criteria ends up with an empty list, which is not an error.
#[must_use]
pub fn filter_records(json: &SheetJson, criteria: &FilterCriteria) -> SheetJson {
    json.iter()
        .map(|(process, records)| {
            let kept = records
                .iter()
                .filter(|record| {
                    criteria.lines.is_empty() || criteria.lines.contains(&record.line)
                })
                .filter(|record| {
                    criteria.defects.is_empty() || criteria.defects.contains(&record.defect)
                })
                .cloned()
                .collect();
            (process.clone(), kept)
        })
        .collect()
}
