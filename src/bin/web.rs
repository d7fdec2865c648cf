//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, DATA_DIR (saved tournaments/profiles, default "data"),
//! SESSION_KEY (at least 64 bytes; a random key is used otherwise).

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{self, Bytes, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use padel_tournament_web::{
    complete_tournament, pair_standings, player_standings, record_result, record_score,
    start_new_round, JsonFileStore, MatchId, MatchResult, ModeKind, PlayerId, PlayerProfile,
    ProfileCatalog, ProfileId, ProfileInput, Repository, Score, Tournament, TournamentId,
    TournamentSetup,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Session key holding the browser's active tournament.
const ACTIVE_TOURNAMENT_KEY: &str = "active_tournament";

/// In-memory state backed by JSON files; every change is saved in the background.
struct AppState {
    tournaments: RwLock<HashMap<TournamentId, Tournament>>,
    catalog: RwLock<ProfileCatalog>,
    tournament_store: Arc<JsonFileStore<Tournament>>,
    profile_store: Arc<JsonFileStore<PlayerProfile>>,
}

type State = Data<AppState>;

impl AppState {
    /// Called with the tournaments lock held, so snapshots are numbered in change order.
    fn save_tournaments(&self, tournaments: &HashMap<TournamentId, Tournament>) {
        let mut records: Vec<Tournament> = tournaments.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        persist(self.tournament_store.clone(), records);
    }

    /// Called with the catalog lock held.
    fn save_profiles(&self, catalog: &ProfileCatalog) {
        persist(self.profile_store.clone(), catalog.profiles().to_vec());
    }
}

/// Background save on the blocking pool; failures are only logged.
/// An older snapshot that finishes late never replaces a newer one.
fn persist<T>(store: Arc<JsonFileStore<T>>, records: Vec<T>)
where
    T: Serialize + Send + 'static,
{
    let generation = store.next_generation();
    tokio::task::spawn_blocking(move || {
        if let Err(e) = store.save_generation(generation, &records) {
            log::error!("Failed to save {:?}: {}", store.path(), e);
        }
    });
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": format!("No {}", what) }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct ProfileQuery {
    #[serde(default)]
    search: String,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Deserialize)]
struct NewPlayerBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    profile_id: Option<ProfileId>,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    mode: ModeKind,
    #[serde(default = "default_courts")]
    courts: u32,
    players: Vec<NewPlayerBody>,
    /// Fixed pairs as indexes into `players`.
    #[serde(default)]
    pairs: Vec<[usize; 2]>,
}

fn default_courts() -> u32 {
    1
}

#[derive(Deserialize)]
struct RecordResultBody {
    #[serde(default)]
    result: Option<MatchResult>,
    #[serde(default)]
    score: Option<Score>,
}

#[derive(Deserialize, Serialize)]
struct ActiveTournamentBody {
    tournament_id: Option<TournamentId>,
}

#[derive(Serialize)]
struct LeaderboardResponse {
    players: Vec<padel_tournament_web::PlayerStanding>,
    pairs: Vec<padel_tournament_web::PairStanding>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

/// Path segment: profile id.
#[derive(Deserialize)]
struct ProfilePath {
    id: ProfileId,
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "padel-tournament-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// List profiles, filtered by search text and category.
#[get("/api/profiles")]
async fn api_list_profiles(state: State, query: Query<ProfileQuery>) -> HttpResponse {
    let catalog = match state.catalog.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let profiles = catalog.search(&query.search, query.category.as_deref());
    HttpResponse::Ok().json(profiles)
}

#[get("/api/categories")]
async fn api_categories(state: State) -> HttpResponse {
    let catalog = match state.catalog.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(catalog.categories())
}

#[post("/api/profiles")]
async fn api_add_profile(state: State, body: Json<ProfileInput>) -> HttpResponse {
    let mut catalog = match state.catalog.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let response = match catalog.add(&body) {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => return bad_request(e),
    };
    state.save_profiles(&catalog);
    response
}

#[put("/api/profiles/{id}")]
async fn api_update_profile(state: State, path: Path<ProfilePath>, body: Json<ProfileInput>) -> HttpResponse {
    let mut catalog = match state.catalog.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if catalog.get(path.id).is_none() {
        return not_found("player profile");
    }
    let response = match catalog.update(path.id, &body) {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => return bad_request(e),
    };
    state.save_profiles(&catalog);
    response
}

/// Delete a profile. Tournament players created from it keep their name.
#[delete("/api/profiles/{id}")]
async fn api_delete_profile(state: State, path: Path<ProfilePath>) -> HttpResponse {
    let mut catalog = match state.catalog.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match catalog.remove(path.id) {
        Ok(profile) => {
            state.save_profiles(&catalog);
            HttpResponse::Ok().json(profile)
        }
        Err(_) => not_found("player profile"),
    }
}

/// Import profiles from a CSV body (header: name,phone,email,id_number,category).
#[post("/api/profiles/import")]
async fn api_import_profiles(state: State, body: Bytes) -> HttpResponse {
    let mut catalog = match state.catalog.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match catalog.import_csv(&body[..]) {
        Ok(imported) => {
            state.save_profiles(&catalog);
            HttpResponse::Ok().json(serde_json::json!({ "imported": imported }))
        }
        Err(e) => bad_request(e),
    }
}

/// All tournaments, newest first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: State) -> HttpResponse {
    let g = match state.tournaments.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut list: Vec<&Tournament> = g.values().collect();
    list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    HttpResponse::Ok().json(list)
}

/// Create and start a tournament from the setup form.
#[post("/api/tournaments")]
async fn api_create_tournament(state: State, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut setup = TournamentSetup::new(body.mode);
    setup.set_name(body.name);
    setup.set_category(body.category);
    if let Err(e) = setup.set_courts(body.courts) {
        return bad_request(e);
    }

    let mut ids: Vec<PlayerId> = Vec::with_capacity(body.players.len());
    {
        let catalog = match state.catalog.read() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        for player in &body.players {
            let added = match player.profile_id {
                Some(profile_id) => match catalog.get(profile_id) {
                    Some(profile) => setup.add_profile_player(profile),
                    None => return not_found("player profile"),
                },
                None => setup.add_manual_player(&player.name),
            };
            match added {
                Ok(id) => ids.push(id),
                Err(e) => return bad_request(e),
            }
        }
    }

    for [a, b] in body.pairs {
        let (Some(&a), Some(&b)) = (ids.get(a), ids.get(b)) else {
            return bad_request("Pair refers to an unknown player");
        };
        if let Err(e) = setup.create_pair(a, b) {
            return bad_request(e);
        }
    }

    let tournament = match setup.start() {
        Ok(t) => t,
        Err(e) => return bad_request(e),
    };
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let response = HttpResponse::Ok().json(&tournament);
    g.insert(tournament.id, tournament);
    state.save_tournaments(&g);
    response
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: State, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.tournaments.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id) {
        Some(t) => HttpResponse::Ok().json(t),
        None => not_found("tournament"),
    }
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: State, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.remove(&path.id) {
        Some(_) => {
            state.save_tournaments(&g);
            HttpResponse::NoContent().finish()
        }
        None => not_found("tournament"),
    }
}

/// Start the next round (the latest round must be completed).
#[post("/api/tournaments/{id}/rounds")]
async fn api_start_round(state: State, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return not_found("tournament"),
    };
    let response = match start_new_round(t) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => return bad_request(e),
    };
    state.save_tournaments(&g);
    response
}

/// Record or edit a match result in the current round: `{result, score?}` or `{score}`.
#[put("/api/tournaments/{id}/matches/{match_id}")]
async fn api_record_result(
    state: State,
    path: Path<TournamentMatchPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return not_found("tournament"),
    };
    let outcome = match (body.result, body.score) {
        (Some(result), score) => record_result(t, path.match_id, result, score),
        (None, Some(score)) => record_score(t, path.match_id, score),
        (None, None) => return bad_request("A result or a score is required"),
    };
    let response = match outcome {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => return bad_request(e),
    };
    state.save_tournaments(&g);
    response
}

/// Mark the tournament as completed.
#[post("/api/tournaments/{id}/complete")]
async fn api_complete_tournament(state: State, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return not_found("tournament"),
    };
    let response = match complete_tournament(t) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => return bad_request(e),
    };
    state.save_tournaments(&g);
    response
}

#[get("/api/tournaments/{id}/leaderboard")]
async fn api_leaderboard(state: State, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.tournaments.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id) {
        Some(t) => HttpResponse::Ok().json(LeaderboardResponse {
            players: player_standings(t),
            pairs: pair_standings(t),
        }),
        None => not_found("tournament"),
    }
}

/// Remember (or forget, with null) the tournament open in this browser.
#[put("/api/session/active")]
async fn api_set_active(session: Session, body: Json<ActiveTournamentBody>) -> HttpResponse {
    match body.tournament_id {
        Some(id) => {
            if let Err(e) = session.insert(ACTIVE_TOURNAMENT_KEY, id) {
                log::warn!("Failed to store active tournament in session: {}", e);
                return HttpResponse::InternalServerError().body("session error");
            }
        }
        None => {
            session.remove(ACTIVE_TOURNAMENT_KEY);
        }
    }
    HttpResponse::Ok().json(&*body)
}

#[get("/api/session/active")]
async fn api_get_active(session: Session) -> HttpResponse {
    let tournament_id = session
        .get::<TournamentId>(ACTIVE_TOURNAMENT_KEY)
        .unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable session value: {}", e);
            None
        });
    HttpResponse::Ok().json(ActiveTournamentBody { tournament_id })
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn session_key() -> Key {
    match std::env::var("SESSION_KEY") {
        Ok(secret) if secret.len() >= 64 => Key::from(secret.as_bytes()),
        Ok(_) => {
            log::warn!("SESSION_KEY shorter than 64 bytes; using a random key");
            Key::generate()
        }
        Err(_) => Key::generate(),
    }
}

/// Load a saved collection. Unreadable data stops startup so it is not overwritten.
fn load_saved<T: Serialize + DeserializeOwned>(store: &JsonFileStore<T>) -> std::io::Result<Vec<T>> {
    store.load().map_err(|e| {
        log::error!("Error loading {:?}: {}", store.path(), e);
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("cannot read {}: {} (fix or move the file aside)", store.path().display(), e),
        )
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| default_data_dir());
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{} (data in {})", bind.0, bind.1, data_dir);

    let tournament_store = Arc::new(JsonFileStore::<Tournament>::in_dir(
        &data_dir,
        padel_tournament_web::storage::TOURNAMENTS_FILE,
    ));
    let profile_store = Arc::new(JsonFileStore::<PlayerProfile>::in_dir(
        &data_dir,
        padel_tournament_web::storage::PROFILES_FILE,
    ));
    let tournaments: HashMap<TournamentId, Tournament> = load_saved(tournament_store.as_ref())?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();
    let catalog = ProfileCatalog::new(load_saved(profile_store.as_ref())?);

    let state = Data::new(AppState {
        tournaments: RwLock::new(tournaments),
        catalog: RwLock::new(catalog),
        tournament_store,
        profile_store,
    });
    let key = session_key();

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(SessionMiddleware::new(CookieSessionStore::default(), key.clone()))
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_list_profiles)
            .service(api_categories)
            .service(api_import_profiles)
            .service(api_add_profile)
            .service(api_update_profile)
            .service(api_delete_profile)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_start_round)
            .service(api_record_result)
            .service(api_complete_tournament)
            .service(api_leaderboard)
            .service(api_set_active)
            .service(api_get_active)
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
