use crate::SignalRelay;
use axum::Router;
use axum::extract::State;
use axum::extract::WebSocketUpgrade;
use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use axum::response::IntoResponse;
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tracing::{info, warn};

pub fn router(relay: SignalRelay) -> Router {
    Router::new().route("/", get(ws_handler)).with_state(relay)
}

pub async fn serve(listener: TcpListener, relay: SignalRelay) -> std::io::Result<()> {
    axum::serve(listener, router(relay)).await
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(relay): State<SignalRelay>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

async fn handle_socket(mut socket: WebSocket, relay: SignalRelay) {
    let (id, mut rx) = match relay.accept() {
        Ok(accepted) => accepted,
        Err(e) => {
            warn!("Refusing WebSocket connection: {}", e);
            let frame = CloseFrame {
                code: close_code::AGAIN,
                reason: e.to_string().into(),
            };
            let _ = socket.send(Message::Close(Some(frame))).await;
            return;
        }
    };

    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let relay = relay.clone();

        async move {
            while let Some(frame) = receiver.next().await {
                match frame {
                    Ok(msg @ (Message::Text(_) | Message::Binary(_))) => {
                        relay.on_message(id, msg);
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("WebSocket error on connection {}: {}", id, e);
                        break;
                    }
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    relay.remove(id);
    info!("WebSocket disconnected: {}", id);
}
