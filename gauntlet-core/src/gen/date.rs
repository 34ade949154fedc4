//! Calendar date generators.

use crate::gen::Gen;
use crate::scaling::Bias;
use chrono::{Days, NaiveDate};

impl Gen<NaiveDate> {
    /// Generate a date in `from..=to`, shrinking towards `from`.
    pub fn date_between(from: NaiveDate, to: NaiveDate) -> Self {
        if from > to {
            return Gen::error(
                "Gen::date_between",
                format!("'from' ({from}) cannot be after 'to' ({to})"),
            );
        }

        let days = (to - from).num_days() as u64;
        Gen::integer()
            .between(0, days)
            .shrink_towards(0)
            .with_bias(Bias::Linear)
            .build()
            .map(move |offset| from.checked_add_days(Days::new(offset)).unwrap_or(to))
    }
}
