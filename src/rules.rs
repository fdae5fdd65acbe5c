//! Which templates fire on a given date

use chrono::Weekday;

use crate::dates::DateDecoration;
use crate::template::EventTemplate;

/// Returns the templates (in table order) that produce an occurrence on the decorated date.
///
/// A template fires when every one of its filters accepts the date. An empty `key_filter` accepts every key.
pub fn applicable_templates<'a>(
    weekday: Weekday,
    templates: &'a [EventTemplate],
    decoration: &DateDecoration,
    key_filter: &[String],
) -> Vec<&'a EventTemplate> {
    templates
        .iter()
        .filter(|template| template.weekdays.contains_day(weekday))
        .filter(|template| template.disabled == false)
        .filter(|template| key_filter.is_empty() || key_filter.iter().any(|key| key == &template.key))
        .filter(|template| template.weeks.is_empty() || template.weeks.contains(&decoration.week_num))
        .filter(|template| template.skip_months.contains(&decoration.month()) == false)
        .collect()
}
