//! Event feed endpoints: buffered tail over HTTP, live stream over
//! websocket. The websocket subscription is the mechanism by which the UI
//! layer learns of state changes without polling the whole store.

use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::Message;

use crate::engine::events::EventFilter;
use crate::engine::store::DomainStore;
use crate::errors::EngineError;

/// GET /api/v1/events, the buffered event tail oldest first.
pub async fn recent(store: web::Data<DomainStore>) -> Result<HttpResponse, EngineError> {
    Ok(HttpResponse::Ok().json(store.bus().recent_events()))
}

/// GET /api/v1/ws/events?group_id=...&presentation_id=...
///
/// Websocket upgrade. Each connection holds one bus subscription scoped by
/// the query filters (none = global); the subscription is dropped when the
/// client disconnects.
pub async fn ws_connect(
    req: HttpRequest,
    body: web::Payload,
    store: web::Data<DomainStore>,
    filter: web::Query<EventFilter>,
) -> Result<HttpResponse, actix_web::Error> {
    let (response, mut ws_session, mut msg_stream) = actix_ws::handle(&req, body)?;

    let bus = store.bus().clone();
    let (handle, mut rx) = bus.subscribe(filter.into_inner().normalize());

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                Some(event) = rx.recv() => {
                    let msg = match serde_json::to_string(&event) {
                        Ok(m) => m,
                        Err(e) => {
                            log::error!("event serialization failed: {e}");
                            continue;
                        }
                    };
                    if ws_session.text(msg).await.is_err() {
                        break;
                    }
                }
                Some(Ok(msg)) = msg_stream.recv() => {
                    match msg {
                        Message::Ping(bytes) => {
                            if ws_session.pong(&bytes).await.is_err() {
                                break;
                            }
                        }
                        Message::Close(_) => break,
                        Message::Text(_) => {
                            // Commands go over HTTP POST, not the socket
                        }
                        _ => {}
                    }
                }
                else => break,
            }
        }

        bus.unsubscribe(handle);
    });

    Ok(response)
}
