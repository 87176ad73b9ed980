//! HTTP client for the measurement service, plus a TCP reachability link.
//!
//! Requests go through a `ureq::Agent` with a per-request timeout. Only a
//! `200` answer counts as success; every other status is a rejection.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use kiosk_traits::{Link, Reporter};
use serde::{Serialize, Serializer};

use crate::error::{HwError, Result};

/// Body of `POST /recive`.
#[derive(Debug, Serialize)]
pub struct Submission<'a> {
    pub bb: f32,
    #[serde(serialize_with = "whole_or_fraction")]
    pub tb: f32,
    pub did: &'a str,
}

/// Integral heights go out as JSON integers (`150`, not `150.0`).
fn whole_or_fraction<S: Serializer>(v: &f32, s: S) -> std::result::Result<S::Ok, S::Error> {
    if v.is_finite() && v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f32 {
        s.serialize_u32(*v as u32)
    } else {
        s.serialize_f32(*v)
    }
}

pub fn submission_json(weight_kg: f32, height_cm: f32, device_id: &str) -> String {
    let body = Submission {
        bb: weight_kg,
        tb: height_cm,
        did: device_id,
    };
    // Serializing a struct of plain numbers and a str cannot fail.
    serde_json::to_string(&body).unwrap_or_default()
}

fn resolve(server: &str) -> Result<SocketAddr> {
    server
        .to_socket_addrs()
        .map_err(|e| HwError::Connect {
            addr: server.to_string(),
            reason: e.to_string(),
        })?
        .next()
        .ok_or_else(|| HwError::Connect {
            addr: server.to_string(),
            reason: "no address".into(),
        })
}

fn connect(server: &str, timeout: Duration) -> Result<TcpStream> {
    let addr = resolve(server)?;
    TcpStream::connect_timeout(&addr, timeout).map_err(|e| HwError::Connect {
        addr: server.to_string(),
        reason: e.to_string(),
    })
}

fn transport_error(server: &str, t: &ureq::Transport) -> HwError {
    match t.kind() {
        ureq::ErrorKind::BadStatus | ureq::ErrorKind::BadHeader => {
            HwError::Protocol(t.to_string())
        }
        _ => HwError::Connect {
            addr: server.to_string(),
            reason: t.to_string(),
        },
    }
}

#[derive(Debug, Clone)]
pub struct HttpReporter {
    server: String,
    agent: ureq::Agent,
}

impl HttpReporter {
    /// `server` is `host:port`; requests go to `http://{server}{path}`.
    pub fn new(server: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("kiosk/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            server: server.into(),
            agent,
        }
    }

    /// POST `body` to `path`; Ok only when the server answers 200.
    pub fn post(&self, path: &str, body: &str) -> Result<String> {
        let url = format!("http://{}{path}", self.server);
        let response = match self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(body)
        {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, resp)) => {
                let text = resp.into_string().unwrap_or_default();
                tracing::debug!(path, status = code, response = %text, "http rejection");
                return Err(HwError::Status(code));
            }
            Err(ureq::Error::Transport(t)) => return Err(transport_error(&self.server, &t)),
        };
        let code = response.status();
        let text = response.into_string()?;
        tracing::debug!(path, status = code, response = %text, "http response");
        if code != 200 {
            return Err(HwError::Status(code));
        }
        Ok(text)
    }
}

impl Reporter for HttpReporter {
    fn reset_device(
        &mut self,
        device_id: &str,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.post(&format!("/reset/{device_id}"), "")?;
        Ok(())
    }

    fn submit_measurement(
        &mut self,
        weight_kg: f32,
        height_cm: f32,
        device_id: &str,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let body = submission_json(weight_kg, height_cm, device_id);
        tracing::info!(payload = %body, "submitting measurement");
        self.post("/recive", &body)?;
        Ok(())
    }
}

/// Host stand-in for WiFi association: "connected" once the service's TCP
/// port accepts a connection.
#[derive(Debug)]
pub struct TcpProbeLink {
    server: String,
    timeout: Duration,
    local: Option<String>,
}

impl TcpProbeLink {
    pub fn new(server: impl Into<String>, timeout: Duration) -> Self {
        Self {
            server: server.into(),
            timeout,
            local: None,
        }
    }

    fn probe(&mut self) -> Result<()> {
        let stream = connect(&self.server, self.timeout)?;
        self.local = stream.local_addr().ok().map(|a| a.ip().to_string());
        Ok(())
    }
}

impl Link for TcpProbeLink {
    fn begin(&mut self) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // An unreachable server is not an error here; is_connected() keeps probing.
        resolve(&self.server)?;
        if let Err(e) = self.probe() {
            tracing::debug!(error = %e, "link probe failed");
        }
        Ok(())
    }

    fn is_connected(&mut self) -> bool {
        if self.local.is_some() {
            return true;
        }
        self.probe().is_ok()
    }

    fn local_addr(&self) -> Option<String> {
        self.local.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_matches_service_schema() {
        assert_eq!(
            submission_json(62.34, 150.0, "IOT_001"),
            r#"{"bb":62.34,"tb":150,"did":"IOT_001"}"#
        );
    }

    #[test]
    fn fractional_height_stays_float() {
        assert_eq!(
            submission_json(0.5, 99.5, "A"),
            r#"{"bb":0.5,"tb":99.5,"did":"A"}"#
        );
    }
}
