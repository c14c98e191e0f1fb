use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

/// `errcode` reported when the request could not complete.
pub const ERRCODE_REQUEST_FAILED: i64 = -1;

/// `errmsg` reported when the request could not complete.
pub const ERRMSG_REQUEST_FAILED: &str = "Request failed";

/// Outcome of one notification request.
///
/// Nothing is ever raised from [`crate::Client::send`]; callers match on the variant instead.
#[derive(Clone, Debug, PartialEq)]
pub enum NotificationResult {
    /// IYUU replied with a JSON body, passed through as-is.
    Json(Value),
    /// IYUU replied, but the body is not JSON.
    NonJson {
        /// HTTP status code.
        status_code: u16,
        /// Raw response body.
        text: String,
    },
    /// Request could not complete e.g. DNS failure, connection refused or timeout.
    Transport {
        /// Description of the failure.
        error: String,
    },
}

impl NotificationResult {
    /// Renders the result as a JSON mapping.
    ///
    /// ```
    /// # use iyuu::NotificationResult;
    /// let r = NotificationResult::NonJson { status_code: 200, text: "plain text".into() };
    /// assert_eq!(r#"{"status_code":200,"text":"plain text"}"#, r.to_value().to_string());
    /// ```
    pub fn to_value(&self) -> Value {
        match self {
            Self::Json(v) => v.clone(),
            Self::NonJson { status_code, text } => json!({
                "status_code": status_code,
                "text": text,
            }),
            Self::Transport { error } => json!({
                "error": error,
                "errcode": ERRCODE_REQUEST_FAILED,
                "errmsg": ERRMSG_REQUEST_FAILED,
            }),
        }
    }

    /// Typed view over the JSON reply, [`None`] if the reply is not shaped like [`Response`].
    pub fn response(&self) -> Option<Response> {
        match self {
            // derived Deserialize also takes a sequence in field order
            Self::Json(v @ Value::Object(_)) => Response::deserialize(v).ok(),
            _ => None,
        }
    }

    /// Whether IYUU accepted the notification i.e. replied with `errcode` 0.
    pub fn is_success(&self) -> bool {
        self.response().map_or(false, |r| r.is_success())
    }
}

impl Serialize for NotificationResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

/// IYUU API response e.g. `{"errcode":0,"errmsg":"ok"}`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Response {
    /// 0 on success.
    pub errcode: i64,
    /// Human readable message.
    pub errmsg: String,
    /// Extra payload, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    /// Whether `errcode` is 0.
    pub fn is_success(&self) -> bool {
        self.errcode == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_transport_to_value() {
        let r = NotificationResult::Transport {
            error: "connection refused".to_string(),
        };
        assert_eq!(
            json!({"error": "connection refused", "errcode": -1, "errmsg": "Request failed"}),
            r.to_value()
        );
        assert!(r.response().is_none());
        assert!(!r.is_success());
    }

    #[test]
    fn t_json_passes_through() {
        let v = json!([1, "two", {"three": 3}]);
        let r = NotificationResult::Json(v.clone());
        assert_eq!(v, r.to_value());
        assert!(r.response().is_none());

        let r = NotificationResult::Json(json!([0, "not an iyuu reply"]));
        assert!(r.response().is_none());
        assert!(!r.is_success());
    }

    #[test]
    fn t_response() {
        let r = NotificationResult::Json(json!({"errcode": 0, "errmsg": "ok"}));
        let res = r.response().unwrap();
        assert_eq!(0, res.errcode);
        assert_eq!("ok", res.errmsg);
        assert!(res.data.is_none());
        assert!(r.is_success());

        let r = NotificationResult::Json(json!({"errcode": 1, "errmsg": "token invalid"}));
        assert!(!r.is_success());
    }

    #[test]
    fn t_serialize() -> Result<(), serde_json::Error> {
        let r = NotificationResult::NonJson {
            status_code: 502,
            text: "Bad Gateway".to_string(),
        };
        let s = serde_json::to_string(&r)?;
        assert_eq!(r#"{"status_code":502,"text":"Bad Gateway"}"#, s);
        Ok(())
    }
}
