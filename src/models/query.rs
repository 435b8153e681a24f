//! Structured conference queries
//!
//! A query form is a list of filter clauses plus an optional ordering. The
//! store supports equality filters on any of city / topic / month /
//! organizer, at most one inequality-filtered numeric field, and multi-key
//! ordering that must lead with the inequality field when one is present.
//! [`ConferenceQuery::from_form`] validates those rules up front so every
//! store implementation can assume a well-formed query.

use std::cmp::Ordering as CmpOrdering;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::{models::Conference, Error, Result};

/// Filterable and sortable conference fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Field {
    City,
    Topic,
    Month,
    MaxAttendees,
    SeatsAvailable,
    OrganizerUserId,
    Name,
}

impl Field {
    /// Fields that accept an equality filter.
    fn supports_equality(self) -> bool {
        matches!(
            self,
            Self::City | Self::Topic | Self::Month | Self::OrganizerUserId
        )
    }

    /// Fields that accept an inequality filter.
    fn is_numeric(self) -> bool {
        matches!(self, Self::Month | Self::MaxAttendees | Self::SeatsAvailable)
    }

    /// Topic is multi-valued and has no total order.
    fn is_sortable(self) -> bool {
        !matches!(self, Self::Topic)
    }

    fn wire_name(self) -> &'static str {
        match self {
            Self::City => "CITY",
            Self::Topic => "TOPIC",
            Self::Month => "MONTH",
            Self::MaxAttendees => "MAX_ATTENDEES",
            Self::SeatsAvailable => "SEATS_AVAILABLE",
            Self::OrganizerUserId => "ORGANIZER_USER_ID",
            Self::Name => "NAME",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "EQ")]
    Eq,
    #[serde(rename = "GT")]
    Gt,
    #[serde(rename = "GTEQ")]
    Gteq,
    #[serde(rename = "LT")]
    Lt,
    #[serde(rename = "LTEQ")]
    Lteq,
}

impl Operator {
    fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Gt => lhs > rhs,
            Self::Gteq => lhs >= rhs,
            Self::Lt => lhs < rhs,
            Self::Lteq => lhs <= rhs,
        }
    }
}

/// One filter clause of a query form.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterClause {
    pub field: Field,
    pub operator: Operator,
    pub value: JsonValue,
}

/// Client form for `queryConferences`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceQueryForm {
    #[serde(default)]
    pub filters: Vec<FilterClause>,
    #[serde(default)]
    pub order: Vec<Field>,
}

/// A validated query, ready for execution by a store.
#[derive(Debug, Clone, Default)]
pub struct ConferenceQuery {
    pub city: Option<String>,
    pub topic: Option<String>,
    pub month: Option<u32>,
    pub organizer_user_id: Option<String>,
    /// The single field inequality clauses apply to, if any.
    pub inequality_field: Option<Field>,
    pub inequality_clauses: Vec<(Operator, i64)>,
    pub order: Vec<Field>,
}

impl ConferenceQuery {
    /// Validate a query form. Rejected combinations: equality on a
    /// non-equality field, inequality clauses on more than one field, an
    /// out-of-range month, an ordering that does not lead with the
    /// inequality field, and ordering by the multi-valued topic field.
    pub fn from_form(form: ConferenceQueryForm) -> Result<Self> {
        let mut query = Self::default();

        for clause in form.filters {
            match clause.operator {
                Operator::Eq => query.apply_equality(clause.field, &clause.value)?,
                op => query.apply_inequality(clause.field, op, &clause.value)?,
            }
        }

        for field in &form.order {
            if !field.is_sortable() {
                return Err(Error::BadRequest(format!(
                    "Cannot order by {}",
                    field.wire_name()
                )));
            }
        }
        query.order = form.order;

        if let Some(inequality) = query.inequality_field {
            match query.order.first() {
                // Ordering keys must include the inequality field first.
                Some(first) if *first != inequality => {
                    return Err(Error::BadRequest(format!(
                        "First ordering field must be {}, the inequality-filtered field",
                        inequality.wire_name()
                    )));
                }
                Some(_) => {}
                None => query.order.push(inequality),
            }
        }

        Ok(query)
    }

    /// The fixed playground query: conferences in London about Web
    /// Technologies in January with more than 10 attendee slots, ordered by
    /// capacity and then name.
    pub fn london_web_tech_in_january() -> Self {
        Self {
            city: Some("London".to_string()),
            topic: Some("Web Technologies".to_string()),
            month: Some(1),
            organizer_user_id: None,
            inequality_field: Some(Field::MaxAttendees),
            inequality_clauses: vec![(Operator::Gt, 10)],
            order: vec![Field::MaxAttendees, Field::Name],
        }
    }

    fn apply_equality(&mut self, field: Field, value: &JsonValue) -> Result<()> {
        if !field.supports_equality() {
            return Err(Error::BadRequest(format!(
                "Equality filter is not supported on {}",
                field.wire_name()
            )));
        }

        let duplicate = match field {
            Field::City => self.city.replace(expect_string(field, value)?).is_some(),
            Field::Topic => self.topic.replace(expect_string(field, value)?).is_some(),
            Field::OrganizerUserId => self
                .organizer_user_id
                .replace(expect_string(field, value)?)
                .is_some(),
            Field::Month => {
                let month = expect_integer(field, value)?;
                if !(1..=12).contains(&month) {
                    return Err(Error::BadRequest(format!(
                        "MONTH must be between 1 and 12, got {month}"
                    )));
                }
                self.month.replace(month as u32).is_some()
            }
            _ => unreachable!("supports_equality covers the remaining fields"),
        };

        if duplicate {
            return Err(Error::BadRequest(format!(
                "Duplicate equality filter on {}",
                field.wire_name()
            )));
        }
        Ok(())
    }

    fn apply_inequality(&mut self, field: Field, op: Operator, value: &JsonValue) -> Result<()> {
        if !field.is_numeric() {
            return Err(Error::BadRequest(format!(
                "Inequality filter is not supported on {}",
                field.wire_name()
            )));
        }
        if self.inequality_field.is_some_and(|f| f != field) {
            return Err(Error::BadRequest(
                "Only one inequality filter per query is allowed".to_string(),
            ));
        }
        self.inequality_field = Some(field);
        self.inequality_clauses
            .push((op, expect_integer(field, value)?));
        Ok(())
    }

    /// Whether a conference satisfies every filter of this query.
    pub fn matches(&self, conference: &Conference) -> bool {
        if let Some(city) = &self.city {
            if conference.city.as_deref() != Some(city.as_str()) {
                return false;
            }
        }
        if let Some(topic) = &self.topic {
            if !conference.topics.iter().any(|t| t == topic) {
                return false;
            }
        }
        if let Some(month) = self.month {
            if conference.month != Some(month) {
                return false;
            }
        }
        if let Some(organizer) = &self.organizer_user_id {
            if &conference.organizer_user_id != organizer {
                return false;
            }
        }
        if let Some(field) = self.inequality_field {
            // A conference without the field (e.g. no start date, so no
            // month) never matches an inequality on it.
            let Some(value) = numeric_field(conference, field) else {
                return false;
            };
            if !self
                .inequality_clauses
                .iter()
                .all(|(op, bound)| op.holds(value, *bound))
            {
                return false;
            }
        }
        true
    }

    /// Total order over conferences per the query's ordering keys, with a
    /// stable key-based tiebreak.
    pub fn compare(&self, a: &Conference, b: &Conference) -> CmpOrdering {
        for field in &self.order {
            let ord = match field {
                Field::Name => a.name.cmp(&b.name),
                Field::City => a.city.cmp(&b.city),
                Field::Month => a.month.cmp(&b.month),
                Field::MaxAttendees => a.max_attendees.cmp(&b.max_attendees),
                Field::SeatsAvailable => a.seats_available.cmp(&b.seats_available),
                Field::OrganizerUserId => a.organizer_user_id.cmp(&b.organizer_user_id),
                Field::Topic => CmpOrdering::Equal,
            };
            if ord != CmpOrdering::Equal {
                return ord;
            }
        }
        (&a.organizer_user_id, a.conference_id).cmp(&(&b.organizer_user_id, b.conference_id))
    }
}

fn numeric_field(conference: &Conference, field: Field) -> Option<i64> {
    match field {
        Field::Month => conference.month.map(i64::from),
        Field::MaxAttendees => Some(i64::from(conference.max_attendees)),
        Field::SeatsAvailable => Some(i64::from(conference.seats_available)),
        _ => None,
    }
}

fn expect_string(field: Field, value: &JsonValue) -> Result<String> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        Error::BadRequest(format!("{} filter requires a string value", field.wire_name()))
    })
}

fn expect_integer(field: Field, value: &JsonValue) -> Result<i64> {
    // Accept both JSON numbers and numeric strings; HTML forms send strings.
    let parsed = match value {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        Error::BadRequest(format!(
            "{} filter requires an integer value",
            field.wire_name()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConferenceForm;
    use serde_json::json;

    fn clause(field: Field, operator: Operator, value: JsonValue) -> FilterClause {
        FilterClause {
            field,
            operator,
            value,
        }
    }

    fn conference(name: &str, city: Option<&str>, month: Option<u32>, max: u32) -> Conference {
        let mut c = Conference::from_form(
            1,
            "u1",
            ConferenceForm {
                name: name.to_string(),
                description: None,
                city: city.map(str::to_string),
                topics: vec!["Web Technologies".to_string()],
                start_date: None,
                end_date: None,
                max_attendees: max,
            },
        );
        c.month = month;
        c
    }

    #[test]
    fn rejects_two_inequality_fields() {
        let form = ConferenceQueryForm {
            filters: vec![
                clause(Field::MaxAttendees, Operator::Gt, json!(10)),
                clause(Field::Month, Operator::Lteq, json!(6)),
            ],
            order: vec![],
        };
        let err = ConferenceQuery::from_form(form).unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn allows_a_range_on_one_field() {
        let form = ConferenceQueryForm {
            filters: vec![
                clause(Field::Month, Operator::Gteq, json!(3)),
                clause(Field::Month, Operator::Lt, json!(6)),
            ],
            order: vec![],
        };
        let query = ConferenceQuery::from_form(form).unwrap();
        assert_eq!(query.inequality_field, Some(Field::Month));
        assert_eq!(query.inequality_clauses.len(), 2);
        // Ordering defaults to the inequality field.
        assert_eq!(query.order, vec![Field::Month]);
    }

    #[test]
    fn rejects_ordering_that_does_not_lead_with_inequality_field() {
        let form = ConferenceQueryForm {
            filters: vec![clause(Field::MaxAttendees, Operator::Gt, json!(10))],
            order: vec![Field::Name, Field::MaxAttendees],
        };
        assert!(ConferenceQuery::from_form(form).is_err());
    }

    #[test]
    fn rejects_equality_on_numeric_only_field() {
        let form = ConferenceQueryForm {
            filters: vec![clause(Field::MaxAttendees, Operator::Eq, json!(10))],
            order: vec![],
        };
        assert!(ConferenceQuery::from_form(form).is_err());
    }

    #[test]
    fn rejects_out_of_range_month() {
        let form = ConferenceQueryForm {
            filters: vec![clause(Field::Month, Operator::Eq, json!(13))],
            order: vec![],
        };
        assert!(ConferenceQuery::from_form(form).is_err());
    }

    #[test]
    fn accepts_numeric_strings() {
        let form = ConferenceQueryForm {
            filters: vec![clause(Field::Month, Operator::Eq, json!("4"))],
            order: vec![],
        };
        let query = ConferenceQuery::from_form(form).unwrap();
        assert_eq!(query.month, Some(4));
    }

    #[test]
    fn matches_applies_all_predicates() {
        let query = ConferenceQuery::london_web_tech_in_january();
        assert!(query.matches(&conference("a", Some("London"), Some(1), 20)));
        assert!(!query.matches(&conference("b", Some("Paris"), Some(1), 20)));
        assert!(!query.matches(&conference("c", Some("London"), Some(2), 20)));
        assert!(!query.matches(&conference("d", Some("London"), Some(1), 10)));
        assert!(!query.matches(&conference("e", Some("London"), None, 20)));
    }

    #[test]
    fn compare_orders_by_keys_then_tiebreaks() {
        let query = ConferenceQuery::london_web_tech_in_january();
        let small = conference("b", Some("London"), Some(1), 11);
        let large_a = conference("a", Some("London"), Some(1), 30);
        let large_z = conference("z", Some("London"), Some(1), 30);
        assert_eq!(query.compare(&small, &large_a), CmpOrdering::Less);
        assert_eq!(query.compare(&large_a, &large_z), CmpOrdering::Less);
    }

    #[test]
    fn field_names_follow_the_wire_format() {
        assert_eq!(
            serde_json::from_value::<Field>(json!("MAX_ATTENDEES")).unwrap(),
            Field::MaxAttendees
        );
        assert_eq!(
            serde_json::from_value::<Operator>(json!("GTEQ")).unwrap(),
            Operator::Gteq
        );
    }
}
