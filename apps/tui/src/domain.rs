use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// A flat member record as served by the tree endpoint.
///
/// Relationship fields reference other members by id and are not
/// guaranteed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub fullname: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub gender: Gender,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub death_date: Option<String>,
    #[serde(default)]
    pub spouse_id: Option<String>,
    #[serde(default)]
    pub parent_ids: Option<Vec<String>>,
    #[serde(default)]
    pub children_ids: Option<Vec<String>>,
    #[serde(default)]
    pub domicile: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub depth: u32,
}

impl Member {
    pub fn children_ids(&self) -> &[String] {
        self.children_ids.as_deref().unwrap_or_default()
    }

    pub const fn has_death_date(&self) -> bool {
        self.death_date.is_some()
    }

    pub fn birth(&self) -> Option<NaiveDate> {
        self.birth_date.as_deref().and_then(parse_iso_date)
    }

    pub fn death(&self) -> Option<NaiveDate> {
        self.death_date.as_deref().and_then(parse_iso_date)
    }

    /// `"1950 - Present"`, `"1950 - 2020"`, or `" - 2020"` when the birth date is unknown.
    pub fn lifespan_label(&self) -> String {
        let birth = self.birth().map(|d| d.year().to_string()).unwrap_or_default();
        let end = if self.has_death_date() {
            self.death().map(|d| d.year().to_string()).unwrap_or_default()
        } else {
            "Present".to_string()
        };
        format!("{birth} - {end}")
    }

    pub fn age_label(&self, today: NaiveDate) -> String {
        let Some(age) = age_in_years(self.birth(), self.death(), today) else {
            return String::new();
        };
        if self.has_death_date() {
            format!("({age} years)")
        } else {
            format!("({age} years old)")
        }
    }

    pub fn initial(&self) -> char {
        self.fullname
            .trim()
            .chars()
            .next()
            .map_or('?', |c| c.to_uppercase().next().unwrap_or(c))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyTreeData {
    pub members: Vec<Member>,
    pub root_id: String,
}

/// Extended record served by the member endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDetail {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub fullname: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub gender: Gender,
    #[serde(default, deserialize_with = "non_empty")]
    pub birth_date: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub death_date: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub detail: MemberExtras,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberExtras {
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub domicile: Option<String>,
    #[serde(default)]
    pub full_address: Option<String>,
    #[serde(default)]
    pub whatsapp_number: Option<String>,
}

impl MemberDetail {
    pub fn birth(&self) -> Option<NaiveDate> {
        self.birth_date.as_deref().and_then(parse_iso_date)
    }

    pub fn death(&self) -> Option<NaiveDate> {
        self.death_date.as_deref().and_then(parse_iso_date)
    }

    pub fn age(&self, today: NaiveDate) -> Option<i32> {
        age_in_years(self.birth(), self.death(), today)
    }

    /// First letters of the first two name words, else the first two characters.
    pub fn initials(&self) -> String {
        let parts: Vec<&str> = self.fullname.split_whitespace().collect();
        if let [first, second, ..] = parts.as_slice() {
            return first
                .chars()
                .take(1)
                .chain(second.chars().take(1))
                .collect::<String>()
                .to_uppercase();
        }
        self.fullname.trim().chars().take(2).collect::<String>().to_uppercase()
    }

    pub fn contact_link(&self) -> Option<String> {
        let digits: String = self
            .detail
            .whatsapp_number
            .as_deref()?
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if digits.is_empty() {
            None
        } else {
            Some(format!("https://wa.me/{digits}"))
        }
    }
}

/// Envelope shared by every backend endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Label for a generation distance from the root as carried in `Member::depth`.
pub fn relationship_label(depth: u32) -> String {
    match depth {
        0 => "root".to_string(),
        1 => "child".to_string(),
        2 => "grandchild".to_string(),
        n => format!("{}grandchild", "great-".repeat((n - 2) as usize)),
    }
}

/// Parses the calendar date prefix of an ISO-8601 string, ignoring any time part.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let date = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

fn age_in_years(birth: Option<NaiveDate>, death: Option<NaiveDate>, today: NaiveDate) -> Option<i32> {
    let birth = birth?;
    let end = death.unwrap_or(today);
    Some(end.year() - birth.year())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(json: &str) -> Member {
        serde_json::from_str(json).expect("member json")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn decodes_camel_case_member_with_missing_optionals() {
        let m = member(r#"{"id":"7","fullname":"Siti Aminah","gender":"female","childrenIds":["8"]}"#);
        assert_eq!(m.gender, Gender::Female);
        assert_eq!(m.children_ids(), ["8".to_string()]);
        assert_eq!(m.spouse_id, None);
        assert_eq!(m.depth, 0);
    }

    #[test]
    fn lifespan_and_age_labels() {
        let living = member(r#"{"id":"1","fullname":"A","gender":"male","birthDate":"1950-03-02"}"#);
        assert_eq!(living.lifespan_label(), "1950 - Present");
        assert_eq!(living.age_label(date(2024, 1, 1)), "(74 years old)");

        let deceased = member(
            r#"{"id":"2","fullname":"B","gender":"male","birthDate":"1920-01-01","deathDate":"1990-06-01T00:00:00Z"}"#,
        );
        assert!(deceased.has_death_date());
        assert_eq!(deceased.lifespan_label(), "1920 - 1990");
        assert_eq!(deceased.age_label(date(2024, 1, 1)), "(70 years)");
    }

    #[test]
    fn malformed_dates_degrade_to_empty_labels() {
        let m = member(r#"{"id":"1","fullname":"A","gender":"male","birthDate":"unknown"}"#);
        assert_eq!(m.birth(), None);
        assert_eq!(m.age_label(date(2024, 1, 1)), "");
    }

    #[test]
    fn member_detail_accepts_numeric_id_and_blank_dates() {
        let detail: MemberDetail = serde_json::from_str(
            r#"{"id":16,"fullname":"budi santoso","gender":"male","birth_date":"1960-08-17","death_date":"",
                "detail":{"profession":"Teacher","domicile":"Bandung","full_address":null,"whatsapp_number":"+62 812-3456"}}"#,
        )
        .expect("detail json");
        assert_eq!(detail.id, "16");
        assert_eq!(detail.death_date, None);
        assert_eq!(detail.initials(), "BS");
        assert_eq!(detail.contact_link().as_deref(), Some("https://wa.me/628123456"));
        assert_eq!(detail.age(date(2020, 1, 1)), Some(60));
    }

    #[test]
    fn single_word_initials_use_first_two_characters() {
        let detail: MemberDetail =
            serde_json::from_str(r#"{"id":"1","fullname":"ahmad","gender":"male"}"#).expect("detail json");
        assert_eq!(detail.initials(), "AH");
        assert_eq!(detail.contact_link(), None);
    }

    #[test]
    fn relationship_labels_by_depth() {
        assert_eq!(relationship_label(0), "root");
        assert_eq!(relationship_label(1), "child");
        assert_eq!(relationship_label(2), "grandchild");
        assert_eq!(relationship_label(4), "great-great-grandchild");
    }

    #[test]
    fn long_date_format() {
        assert_eq!(format_long_date(date(1960, 8, 7)), "7 August 1960");
    }

    #[test]
    fn gender_decodes_lowercase_and_labels() {
        let gender: Gender = serde_json::from_str("\"female\"").expect("gender json");
        assert_eq!(gender.label(), "Female");
    }
}
