#[cfg(test)]
#[path = "server_test.rs"]
mod tests;

use anyhow::Result;
use bytes::Bytes;
use chrono::Utc;
use http_body_util::BodyExt;
use http_body_util::Full;
use http_body_util::LengthLimitError;
use http_body_util::Limited;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Method;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use serde_derive::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

use crate::domain::models::DeskError;
use crate::domain::models::Direction;
use crate::domain::models::MirrorMessage;
use crate::infrastructure::mirror::SqliteMirror;

// Valid payloads are a few hundred bytes; anything near this is abuse.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// The single ingest schema. `timestamp` defaults to now, `direction` to
/// `received` when a caller omits them.
#[derive(Debug, Deserialize)]
struct IngestPayload {
    #[serde(rename = "contactId")]
    contact_id: String,
    message: String,
    timestamp: Option<i64>,
    direction: Option<Direction>,
}

fn json_response(
    status: StatusCode,
    body: serde_json::Value,
) -> hyper::http::Result<Response<Full<Bytes>>> {
    return Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())));
}

async fn handle(
    req: Request<Incoming>,
    mirror: SqliteMirror,
) -> hyper::http::Result<Response<Full<Bytes>>> {
    if req.uri().path() != "/api/messages" {
        return json_response(StatusCode::NOT_FOUND, json!({"error": "not found"}));
    }
    if req.method() != Method::POST {
        return Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header("Allow", "POST")
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(
                json!({"error": "Método não permitido"}).to_string(),
            )));
    }

    let body = match Limited::new(req.into_body(), MAX_BODY_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            if err.downcast_ref::<LengthLimitError>().is_some() {
                return json_response(
                    StatusCode::BAD_REQUEST,
                    json!({"error": "payload exceeds the size limit"}),
                );
            }

            tracing::error!(error = ?err, "failed to read ingest body");
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Erro ao processar a mensagem."}),
            );
        }
    };

    let payload: IngestPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                json!({"error": format!("invalid payload: {err}")}),
            );
        }
    };

    let message = MirrorMessage {
        contact_id: payload.contact_id,
        message: payload.message,
        timestamp: payload
            .timestamp
            .unwrap_or_else(|| return Utc::now().timestamp_millis()),
        direction: payload.direction.unwrap_or(Direction::Received),
    };

    if let Err(err) = mirror.append(&message) {
        if err
            .downcast_ref::<DeskError>()
            .is_some_and(|desk_err| return desk_err.is_validation())
        {
            return json_response(StatusCode::BAD_REQUEST, json!({"error": err.to_string()}));
        }

        tracing::error!(error = ?err, "ingest append failed");
        return json_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "Erro ao processar a mensagem."}),
        );
    }

    tracing::debug!(contact_id = message.contact_id.as_str(), "ingested message");
    return json_response(
        StatusCode::OK,
        json!({"status": "Mensagem enviada e salva com sucesso!"}),
    );
}

/// HTTP surface for external systems to append into the mirror. One route,
/// `POST /api/messages`.
pub struct IngestServer {}

impl IngestServer {
    pub async fn start(addr: &str, mirror: SqliteMirror) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr = addr, "ingest server listening");

        return IngestServer::serve(listener, mirror).await;
    }

    pub async fn serve(listener: TcpListener, mirror: SqliteMirror) -> Result<()> {
        loop {
            let (stream, _) = listener.accept().await?;
            let mirror = mirror.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let mirror = mirror.clone();
                    return handle(req, mirror);
                });

                if let Err(err) = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await
                {
                    tracing::debug!(error = ?err, "ingest connection closed with error");
                }
            });
        }
    }
}
