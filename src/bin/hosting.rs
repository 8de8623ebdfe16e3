//! hosting Server Binary
//!
//! Runs the HTTP server for live mahjong rooms.
//! Players connect over WebSocket and exchange JSON envelopes.

use sanma::*;

#[tokio::main]
async fn main() {
    log();
    kys();
    hosting::Server::run().await.unwrap();
}
