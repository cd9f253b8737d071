use crate::{Config, FormState, PredictError, model::PredictResponse, service::http::HttpPredictionService};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod http;

/// Something that turns a filled form into a predicted temperature.
#[async_trait]
pub trait PredictionService: Send + Sync + Debug {
    async fn predict(&self, form: &FormState) -> Result<f64, PredictError>;
}

/// Construct the HTTP service pointed at the configured endpoint.
pub fn service_from_config(config: &Config) -> Box<dyn PredictionService> {
    Box::new(HttpPredictionService::new(config.endpoint().to_owned()))
}

/// Map a decoded response body onto a prediction or an error.
///
/// A body that claims success without a number, or failure without a
/// message, is treated as malformed.
pub fn interpret_response(response: PredictResponse) -> Result<f64, PredictError> {
    match response {
        PredictResponse { success: true, prediction: Some(p), .. } => Ok(p),
        PredictResponse { success: true, prediction: None, .. } => Err(PredictError::Transport(
            "response reported success without a prediction".into(),
        )),
        PredictResponse { success: false, error: Some(msg), .. } => {
            Err(PredictError::ServerReported(msg))
        }
        PredictResponse { success: false, error: None, .. } => Err(PredictError::Transport(
            "response reported failure without an error message".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> PredictResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn success_with_prediction() {
        let res = interpret_response(decode(r#"{"success": true, "prediction": 21.5}"#));
        assert_eq!(res, Ok(21.5));
    }

    #[test]
    fn failure_with_message() {
        let res = interpret_response(decode(r#"{"success": false, "error": "bad input"}"#));
        assert_eq!(res, Err(PredictError::ServerReported("bad input".into())));
    }

    #[test]
    fn incomplete_bodies_are_transport_errors() {
        let res = interpret_response(decode(r#"{"success": true}"#));
        assert!(matches!(res, Err(PredictError::Transport(_))));

        let res = interpret_response(decode(r#"{"success": false}"#));
        assert!(matches!(res, Err(PredictError::Transport(_))));
    }

    #[test]
    fn service_from_config_uses_endpoint() {
        let mut cfg = Config::default();
        cfg.set_endpoint("http://127.0.0.1:9/predict").unwrap();

        let service = service_from_config(&cfg);
        assert!(format!("{service:?}").contains("http://127.0.0.1:9/predict"));
    }
}
