use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};
use std::{convert::TryFrom, fmt};

/// One input of the prediction form, in the order the form presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Latitude,
    Longitude,
    WindMph,
    PressureMb,
    Humidity,
    Cloud,
    VisibilityKm,
    GustMph,
    Condition,
}

impl FormField {
    /// Key used in the JSON request body.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Latitude => "latitude",
            FormField::Longitude => "longitude",
            FormField::WindMph => "wind_mph",
            FormField::PressureMb => "pressure_mb",
            FormField::Humidity => "humidity",
            FormField::Cloud => "cloud",
            FormField::VisibilityKm => "visibility_km",
            FormField::GustMph => "gust_mph",
            FormField::Condition => "condition",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Latitude => "Latitude (-90 to 90)",
            FormField::Longitude => "Longitude (-180 to 180)",
            FormField::WindMph => "Wind Speed (0 to 100 mph)",
            FormField::PressureMb => "Pressure (900 to 1100 mb)",
            FormField::Humidity => "Humidity (0 to 100%)",
            FormField::Cloud => "Cloud Cover (0 to 100%)",
            FormField::VisibilityKm => "Visibility (0 to 50 km)",
            FormField::GustMph => "Gust Speed (0 to 150 mph)",
            FormField::Condition => "Weather Condition",
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            FormField::Latitude => Some("e.g., 40.7128"),
            FormField::Longitude => Some("e.g., -74.0060"),
            FormField::WindMph => Some("e.g., 10"),
            FormField::PressureMb => Some("e.g., 1013"),
            FormField::Humidity => Some("e.g., 70"),
            FormField::Cloud => Some("e.g., 50"),
            FormField::VisibilityKm => Some("e.g., 10"),
            FormField::GustMph => Some("e.g., 20"),
            FormField::Condition => None,
        }
    }

    /// Advisory inclusive range for numeric fields. `None` for `Condition`.
    pub fn range(&self) -> Option<(f64, f64)> {
        match self {
            FormField::Latitude => Some((-90.0, 90.0)),
            FormField::Longitude => Some((-180.0, 180.0)),
            FormField::WindMph => Some((0.0, 100.0)),
            FormField::PressureMb => Some((900.0, 1100.0)),
            FormField::Humidity => Some((0.0, 100.0)),
            FormField::Cloud => Some((0.0, 100.0)),
            FormField::VisibilityKm => Some((0.0, 50.0)),
            FormField::GustMph => Some((0.0, 150.0)),
            FormField::Condition => None,
        }
    }

    pub const fn all() -> &'static [FormField] {
        &[
            FormField::Latitude,
            FormField::Longitude,
            FormField::WindMph,
            FormField::PressureMb,
            FormField::Humidity,
            FormField::Cloud,
            FormField::VisibilityKm,
            FormField::GustMph,
            FormField::Condition,
        ]
    }

    /// Checks a raw value against the field's advisory constraints.
    ///
    /// This mirrors what a numeric input widget would enforce; the submission
    /// path never calls it.
    pub fn check(&self, value: &str) -> anyhow::Result<()> {
        match self.range() {
            None => Condition::try_from(value).map(|_| ()),
            Some((min, max)) => {
                let parsed: f64 = value
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("'{value}' is not a number"))?;
                if !parsed.is_finite() || parsed < min || parsed > max {
                    anyhow::bail!("must be between {min} and {max}");
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for FormField {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        FormField::all()
            .iter()
            .copied()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| anyhow::anyhow!("Unknown form field '{value}'."))
    }
}

/// Observed sky condition, sent to the service as its display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Condition {
    #[default]
    Sunny,
    PartlyCloudy,
    Cloudy,
    Overcast,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Sunny => "Sunny",
            Condition::PartlyCloudy => "Partly cloudy",
            Condition::Cloudy => "Cloudy",
            Condition::Overcast => "Overcast",
        }
    }

    pub const fn all() -> &'static [Condition] {
        &[
            Condition::Sunny,
            Condition::PartlyCloudy,
            Condition::Cloudy,
            Condition::Overcast,
        ]
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Condition {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Condition::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown condition '{value}'. Supported conditions: Sunny, Partly cloudy, Cloudy, Overcast."
                )
            })
    }
}

/// Current values of every form input, held as the user typed them.
///
/// All nine keys are always present. Values are never coerced; the service
/// receives exactly these strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    values: [String; 9],
}

impl Default for FormState {
    fn default() -> Self {
        let mut values: [String; 9] = Default::default();
        values[8] = Condition::default().as_str().to_string();
        Self { values }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(field: FormField) -> usize {
        match field {
            FormField::Latitude => 0,
            FormField::Longitude => 1,
            FormField::WindMph => 2,
            FormField::PressureMb => 3,
            FormField::Humidity => 4,
            FormField::Cloud => 5,
            FormField::VisibilityKm => 6,
            FormField::GustMph => 7,
            FormField::Condition => 8,
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        &self.values[Self::index(field)]
    }

    /// Replace one field's value, leaving the others untouched.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.values[Self::index(field)] = value.into();
    }

    /// Builder-style `set`, handy for constructing a filled form in one go.
    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (FormField, &str)> {
        FormField::all().iter().map(|f| (*f, self.get(*f)))
    }

    /// Fields whose current value would be rejected by the input widgets.
    pub fn advisory_violations(&self) -> Vec<(FormField, String)> {
        self.fields()
            .filter_map(|(field, value)| field.check(value).err().map(|err| (field, err.to_string())))
            .collect()
    }
}

impl Serialize for FormState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FormField::all().len()))?;
        for (field, value) in self.fields() {
            map.serialize_entry(field.as_str(), value)?;
        }
        map.end()
    }
}

/// Body returned by the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Parse the leading decimal number of `raw`, ignoring any trailing text.
///
/// `"10"` and `"10 mph"` both give `Some(10.0)`; `"abc"` and `""` give `None`.
/// Leading whitespace is skipped. Results that overflow to infinity are `None`.
pub fn parse_leading_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
