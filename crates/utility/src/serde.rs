pub mod epoch_millis {
    use chrono::{DateTime, Local, TimeZone as _};
    use serde::{
        de::{Error, IntoDeserializer},
        Deserialize as _, Deserializer, Serializer,
    };

    /// Timestamps sent as (possibly fractional) milliseconds since the unix epoch.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = f64::deserialize(deserializer)?;
        if !millis.is_finite() {
            return Err(Error::custom("timestamp is not a finite number"));
        }
        Local
            .timestamp_millis_opt(millis.round() as i64)
            .single()
            .ok_or_else(|| Error::custom(format!("timestamp out of range: {millis}")))
    }

    pub fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<Local>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<f64>::deserialize(deserializer)?;
        match millis {
            Some(millis) => deserialize(millis.into_deserializer()).map(Some),
            None => Ok(None),
        }
    }

    pub fn serialize<S>(date_time: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(date_time.timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Local};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Eta {
        #[serde(with = "super::epoch_millis")]
        eta: DateTime<Local>,
    }

    #[test]
    fn parses_fractional_milliseconds() {
        let eta: Eta = serde_json::from_str(r#"{"eta": 1700000000123.7}"#).unwrap();
        assert_eq!(eta.eta.timestamp_millis(), 1700000000124);
        assert_eq!(
            serde_json::to_string(&eta).unwrap(),
            r#"{"eta":1700000000124}"#
        );
    }

    #[test]
    fn rejects_strings() {
        assert!(serde_json::from_str::<Eta>(r#"{"eta": "soon"}"#).is_err());
    }
}
