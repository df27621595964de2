use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};

/// Accepts integer or float dim levels in 0..=100, the value is kept as sent.
///
/// `null` counts as an absent dim level, which makes the appliance a switch.
pub fn deserialize_dim_level<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if !(0.0..=100.0).contains(&value) {
        return Err(Error::custom(format!("invalid dim level: {}, must be between 0 and 100", value)));
    }

    Ok(Some(value))
}

/// Writes whole dim levels as integers and fractional ones unchanged.
pub fn serialize_dim_level<S>(dim_level: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dim_level {
        Some(value) if value.fract() == 0.0 => serializer.serialize_some(&(*value as i64)),
        Some(value) => serializer.serialize_some(value),
        None => serializer.serialize_none(),
    }
}
