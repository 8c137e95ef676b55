//! Live tally feed: pushes idea documents to subscribed views whenever one
//! changes, so tallies update without polling.
//!
//! Each WebSocket connection gets an unbounded channel registered in a
//! shared subscriber list. Publishers serialize a frame once and fan it
//! out; a subscriber's own frames arrive in publish order, while frames
//! for different documents carry no cross-ordering guarantee. The
//! connection task removes its sender when the socket closes, and
//! `publish` prunes senders that are already gone.

use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::Message;
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

use crate::models::idea::{self, Idea};

pub struct Subscriber {
    tx: mpsc::UnboundedSender<String>,
    region: Option<String>,
}

pub type SubscriberMap = Arc<RwLock<Vec<Subscriber>>>;

pub fn new_subscriber_map() -> SubscriberMap {
    Arc::new(RwLock::new(Vec::new()))
}

/// Register a sender, scoped to all ideas or to one region.
pub fn subscribe(map: &SubscriberMap, tx: mpsc::UnboundedSender<String>, region: Option<String>) {
    let mut subs = match map.write() {
        Ok(s) => s,
        Err(e) => e.into_inner(),
    };
    subs.push(Subscriber { tx, region });
}

fn publish(map: &SubscriberMap, idea_region: Option<&str>, frame: String) {
    let mut subs = match map.write() {
        Ok(s) => s,
        Err(e) => e.into_inner(),
    };
    subs.retain(|s| !s.tx.is_closed());
    for sub in subs.iter() {
        let wanted = match (&sub.region, idea_region) {
            (None, _) => true,
            (Some(want), Some(have)) => want == have,
            (Some(_), None) => false,
        };
        if wanted {
            let _ = sub.tx.send(frame.clone());
        }
    }
}

pub fn publish_created(map: &SubscriberMap, idea: &Idea) {
    let frame = serde_json::json!({ "type": "idea_created", "idea": idea }).to_string();
    publish(map, idea.region.as_deref(), frame);
}

pub fn publish_updated(map: &SubscriberMap, idea: &Idea) {
    let frame = serde_json::json!({ "type": "idea_updated", "idea": idea }).to_string();
    publish(map, idea.region.as_deref(), frame);
}

#[derive(Deserialize)]
pub struct FeedQuery {
    pub region: Option<String>,
}

/// WebSocket upgrade handler for `/ws/ideas`.
///
/// Tallies are public reads, so no session is required. The subscriber is
/// registered before the snapshot is computed, so an update racing the
/// snapshot is delivered rather than lost (it may repeat snapshot state).
pub async fn ws_connect(
    req: HttpRequest,
    body: web::Payload,
    pool: web::Data<PgPool>,
    subscribers: web::Data<SubscriberMap>,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse, actix_web::Error> {
    let (response, mut ws_session, mut msg_stream) = actix_ws::handle(&req, body)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let region = query.into_inner().region;
    subscribe(&subscribers, tx, region.clone());

    let pool = pool.into_inner();

    actix_web::rt::spawn(async move {
        // Initial full snapshot, then incremental frames from the channel.
        let snapshot = match idea::find_all(&pool).await {
            Ok(ideas) => {
                let scoped: Vec<&Idea> = ideas
                    .iter()
                    .filter(|i| match &region {
                        Some(r) => i.region.as_deref() == Some(r.as_str()),
                        None => true,
                    })
                    .collect();
                serde_json::json!({ "type": "snapshot", "ideas": scoped }).to_string()
            }
            Err(e) => {
                log::warn!("feed snapshot failed: {e}");
                let _ = ws_session.close(None).await;
                return;
            }
        };
        if ws_session.text(snapshot).await.is_err() {
            return;
        }

        loop {
            tokio::select! {
                Some(frame) = rx.recv() => {
                    if ws_session.text(frame).await.is_err() {
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
                        _ => {}
                    }
                }
                else => break,
            }
        }
        // Dropping `rx` closes the sender; the next publish prunes it.
    });

    Ok(response)
}
