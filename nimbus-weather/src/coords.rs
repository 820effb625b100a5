//! Coordinate argument handling.

use nimbus_tools::ToolError;
use serde::Deserialize;

/// A latitude or longitude as the model supplies it.
///
/// The geocode tool passes provider values through verbatim, which are
/// strings in practice, so the model may echo either form back.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Coord {
    Number(f64),
    Text(String),
}

impl Coord {
    pub(crate) fn value(&self) -> Result<f64, ToolError> {
        match self {
            Coord::Number(n) => Ok(*n),
            Coord::Text(s) => s
                .parse()
                .map_err(|_| ToolError::invalid_args(format!("not a coordinate: {s:?}"))),
        }
    }
}

/// Arguments shared by the realtime and forecast tools.
#[derive(Debug, Deserialize)]
pub(crate) struct CoordArgs {
    pub lat: Coord,
    pub lng: Coord,
}

impl CoordArgs {
    /// The provider's "lat,lng" location parameter.
    pub(crate) fn location_param(&self) -> Result<String, ToolError> {
        Ok(format!("{},{}", self.lat.value()?, self.lng.value()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_text_coords() {
        let args: CoordArgs = serde_json::from_value(json!({"lat": 51.1, "lng": -0.1})).unwrap();
        assert_eq!(args.location_param().unwrap(), "51.1,-0.1");

        let args: CoordArgs =
            serde_json::from_value(json!({"lat": "51.5073219", "lng": "-0.1276474"})).unwrap();
        assert_eq!(args.location_param().unwrap(), "51.5073219,-0.1276474");
    }

    #[test]
    fn test_bad_text_coord() {
        let args: CoordArgs =
            serde_json::from_value(json!({"lat": "north", "lng": 0.0})).unwrap();
        assert!(args.location_param().is_err());
    }
}
