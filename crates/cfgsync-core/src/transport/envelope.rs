//! Map an HTTP status and JSON body to a response or a fault.

use serde_json::Value;

use crate::fault::RemoteFault;

/// Pull `{"fault": {"message": ..., "code": ...}}` out of a body.
fn fault_from_body(body: &Value) -> Option<RemoteFault> {
    let fault = body.get("fault")?;
    let message = fault.get("message")?.as_str()?;
    let code = match fault.get("code") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    Some(RemoteFault {
        message: message.to_string(),
        code,
    })
}

/// Interpret one HTTP exchange.
///
/// A fault object in the body wins regardless of status. Otherwise 2xx is
/// success (an empty body reads as `null`), 401/403 become authentication
/// faults and any other status a generic `HTTP <status>` fault.
pub fn parse_response(status: u32, body: &[u8]) -> Result<Value, RemoteFault> {
    let blank = body.iter().all(u8::is_ascii_whitespace);
    let parsed: Option<Value> = if blank {
        None
    } else {
        serde_json::from_slice(body).ok()
    };

    if let Some(fault) = parsed.as_ref().and_then(fault_from_body) {
        return Err(fault);
    }

    match status {
        200..=299 if blank => Ok(Value::Null),
        200..=299 => parsed.ok_or_else(|| {
            RemoteFault::new(format!("HTTP {status}: response body is not JSON"))
                .with_code(status.to_string())
        }),
        401 => Err(RemoteFault::new("HTTP 401 Unauthorized").with_code("401")),
        403 => Err(RemoteFault::new("HTTP 403 Access denied").with_code("403")),
        _ => Err(RemoteFault::new(format!("HTTP {status}")).with_code(status.to_string())),
    }
}
