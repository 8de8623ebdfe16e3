use super::*;
use crate::ID;
use crate::Member;
use crate::config::Config;
use crate::gameroom::Room;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use serde::Deserialize;

pub struct Server;

impl Server {
    pub async fn run() -> Result<(), std::io::Error> {
        let state = web::Data::new(Casino::default());
        log::info!("starting hosting server");
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(state.clone())
                .route("/rooms", web::post().to(open))
                .route("/rooms/{room_id}/enter", web::get().to(enter))
                .route("/rooms/{room_id}/close", web::post().to(close))
        })
        .workers(4)
        .bind(std::env::var("BIND_ADDR").expect("BIND_ADDR must be set"))?
        .run()
        .await
    }
}

/// Body of `POST /rooms`. Missing rule fields take their defaults.
#[derive(Debug, Deserialize)]
struct Opening {
    players: Vec<ID<Member>>,
    #[serde(default)]
    config: Config,
    seed: Option<u64>,
}

async fn open(casino: web::Data<Casino>, body: web::Json<Opening>) -> impl Responder {
    let Opening {
        players,
        config,
        seed,
    } = body.into_inner();
    let seed = seed.unwrap_or_else(rand::random);
    match casino.open(config, players, seed).await {
        Ok(id) => HttpResponse::Ok().json(serde_json::json!({ "room_id": id })),
        Err(e) => HttpResponse::BadRequest().body(e.to_string()),
    }
}

async fn close(casino: web::Data<Casino>, path: web::Path<String>) -> impl Responder {
    let Ok(id) = ID::<Room>::try_from(path.as_str()) else {
        return HttpResponse::BadRequest().body("malformed room id");
    };
    match casino.close(id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "closed" })),
        Err(e) => HttpResponse::NotFound().body(e.to_string()),
    }
}

/// Upgrades to a WebSocket for the player named by the `x-player`
/// credential header.
async fn enter(
    casino: web::Data<Casino>,
    path: web::Path<String>,
    body: web::Payload,
    req: HttpRequest,
) -> impl Responder {
    let Ok(id) = ID::<Room>::try_from(path.as_str()) else {
        return HttpResponse::BadRequest().body("malformed room id").map_into_right_body();
    };
    let token = req
        .headers()
        .get("x-player")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let player = match casino.authenticate(token) {
        Ok(player) => player,
        Err(e) => return HttpResponse::Unauthorized().body(e.to_string()).map_into_right_body(),
    };
    match actix_ws::handle(&req, body) {
        Ok((response, session, stream)) => match casino.bridge(id, player, session, stream).await {
            Ok(()) => response.map_into_left_body(),
            Err(e) => HttpResponse::NotFound()
                .body(e.to_string())
                .map_into_right_body(),
        },
        Err(e) => HttpResponse::InternalServerError()
            .body(e.to_string())
            .map_into_right_body(),
    }
}
