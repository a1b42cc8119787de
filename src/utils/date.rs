pub const DATE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

fn time_to_json(t: chrono::NaiveDateTime) -> String {
    chrono::DateTime::<chrono::Utc>::from_naive_utc_and_offset(t, chrono::Utc).to_rfc3339()
}

fn json_to_time(str_time: &str) -> Result<chrono::NaiveDateTime, chrono::ParseError> {
    chrono::DateTime::parse_from_rfc3339(str_time)
        .map(|t| t.naive_utc())
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(str_time, DATE_FMT))
}

pub mod serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        super::time_to_json(*time).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let str_time: String = Deserialize::deserialize(deserializer)?;
        super::json_to_time(str_time.as_str()).map_err(D::Error::custom)
    }
}

// same as serializer but for nullable timestamps such as a loan's return date
pub mod opt_serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;

    pub fn serialize<S: Serializer>(time: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
        time.map(super::time_to_json).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
        let str_time: Option<String> = Deserialize::deserialize(deserializer)?;
        match str_time {
            Some(str_time) => super::json_to_time(str_time.as_str()).map(Some).map_err(D::Error::custom),
            None => Ok(None),
        }
    }
}
