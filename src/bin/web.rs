//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Settings come from the environment, see `padel_tracker::config`.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionExt, SessionMiddleware};
use actix_web::{
    cookie::Key,
    dev::Payload,
    error::InternalError,
    get, post, put,
    web::{self, Data, Json, Path},
    App, FromRequest, HttpRequest, HttpResponse, HttpServer, Responder,
};
use padel_tracker::{AccessGrant, Config, Ledger, LedgerError, MatchForm, PasswordGate, SessionToken};
use serde::Deserialize;
use std::future::{ready, Ready};
use std::sync::RwLock;

/// Session key holding the token handed out by the password gate.
const TOKEN_KEY: &str = "access_token";

/// Process-wide state: the ledger behind one lock, and the password gate.
struct TrackerState {
    ledger: RwLock<Ledger>,
    gate: PasswordGate,
}

type AppState = Data<TrackerState>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct LoginBody {
    password: String,
}

#[derive(Deserialize)]
struct CorrectionBody {
    wins: u32,
    game_diff: i64,
}

/// Path segment: player name (e.g. /api/stats/{player})
#[derive(Deserialize)]
struct PlayerPath {
    player: String,
}

/// Extracted from any request whose session carries a token the gate still honours.
struct Unlocked(AccessGrant);

fn locked() -> actix_web::Error {
    InternalError::from_response(
        "locked",
        HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Enter the password first" })),
    )
    .into()
}

impl FromRequest for Unlocked {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<AppState>() else {
            return ready(Err(actix_web::error::ErrorInternalServerError("missing state")));
        };
        let token = req
            .get_session()
            .get::<SessionToken>(TOKEN_KEY)
            .ok()
            .flatten();
        ready(
            token
                .and_then(|t| state.gate.admit(t))
                .map(Unlocked)
                .ok_or_else(locked),
        )
    }
}

fn error_response(e: &LedgerError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        LedgerError::AccessDenied => HttpResponse::Unauthorized().json(body),
        LedgerError::Storage(_) => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "padel-tracker",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Check the shared password and remember the issued token in the session.
#[post("/api/login")]
async fn api_login(state: AppState, session: Session, body: Json<LoginBody>) -> HttpResponse {
    let previous = session.get::<SessionToken>(TOKEN_KEY).ok().flatten();
    match state.gate.unlock_replacing(&body.password, previous) {
        Ok(token) => {
            session.renew();
            match session.insert(TOKEN_KEY, token) {
                Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "unlocked": true })),
                Err(e) => {
                    log::error!("Could not store session token: {}", e);
                    HttpResponse::InternalServerError().body("session error")
                }
            }
        }
        Err(e) => error_response(&e),
    }
}

#[post("/api/logout")]
async fn api_logout(state: AppState, session: Session) -> HttpResponse {
    if let Ok(Some(token)) = session.get::<SessionToken>(TOKEN_KEY) {
        state.gate.revoke(token);
    }
    session.purge();
    HttpResponse::Ok().json(serde_json::json!({ "unlocked": false }))
}

/// Whether this browser is past the password gate (the page uses it to pick a view).
#[get("/api/session")]
async fn api_session(state: AppState, session: Session) -> HttpResponse {
    let unlocked = session
        .get::<SessionToken>(TOKEN_KEY)
        .ok()
        .flatten()
        .and_then(|t| state.gate.admit(t))
        .is_some();
    HttpResponse::Ok().json(serde_json::json!({ "unlocked": unlocked }))
}

/// Roster, places and defaults for the match form.
#[get("/api/config")]
async fn api_config(state: AppState, _access: Unlocked) -> HttpResponse {
    let g = match state.ledger.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.config().public())
}

/// Player stats ranked by wins, then differential.
#[get("/api/stats")]
async fn api_stats(state: AppState, _access: Unlocked) -> HttpResponse {
    let g = match state.ledger.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.ranked())
}

/// Match history, newest first.
#[get("/api/matches")]
async fn api_matches(state: AppState, _access: Unlocked) -> HttpResponse {
    let g = match state.ledger.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.matches_newest_first())
}

/// Record a new match; returns the stored entry.
#[post("/api/matches")]
async fn api_record_match(state: AppState, access: Unlocked, body: Json<MatchForm>) -> HttpResponse {
    let mut g = match state.ledger.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let today = chrono::Local::now().date_naive();
    match g.record_match(&access.0, &body, today) {
        Ok(entry) => HttpResponse::Ok().json(entry),
        Err(e) => error_response(&e),
    }
}

/// Bar (wins) and line (differential) series for the chart.
#[get("/api/chart")]
async fn api_chart(state: AppState, _access: Unlocked) -> HttpResponse {
    let g = match state.ledger.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.chart())
}

/// Players whose stored stats differ from a replay of the match log.
#[get("/api/stats/audit")]
async fn api_audit(state: AppState, _access: Unlocked) -> HttpResponse {
    let g = match state.ledger.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.audit() {
        Ok(found) => HttpResponse::Ok().json(found),
        Err(e) => error_response(&e),
    }
}

/// Recompute all stats from the match log.
#[post("/api/stats/rebuild")]
async fn api_rebuild(state: AppState, access: Unlocked) -> HttpResponse {
    let mut g = match state.ledger.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.rebuild(&access.0) {
        Ok(()) => HttpResponse::Ok().json(g.ranked()),
        Err(e) => error_response(&e),
    }
}

/// Set a player's wins and differential manually.
#[put("/api/stats/{player}")]
async fn api_correct_player(
    state: AppState,
    access: Unlocked,
    path: Path<PlayerPath>,
    body: Json<CorrectionBody>,
) -> HttpResponse {
    let mut g = match state.ledger.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.correct_player(&access.0, &path.player, body.wins, body.game_diff) {
        Ok(row) => HttpResponse::Ok().json(row),
        Err(e) => error_response(&e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let bind = (config.host.clone(), config.port);
    let gate = PasswordGate::new(config.password.clone());
    let ledger = Ledger::open(config).map_err(|e| std::io::Error::other(e.to_string()))?;
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(TrackerState {
        ledger: RwLock::new(ledger),
        gate,
    });
    // Sessions do not outlive the process; the gate forgets its tokens on restart anyway.
    let key = Key::generate();

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_login)
            .service(api_logout)
            .service(api_session)
            .service(api_config)
            .service(api_stats)
            .service(api_audit)
            .service(api_rebuild)
            .service(api_correct_player)
            .service(api_matches)
            .service(api_record_match)
            .service(api_chart)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
