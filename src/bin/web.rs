//! Single binary web server: competition state and admin actions via a JSON REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, DATA_PATH (state file), ADMIN_USERNAME, ADMIN_PASSWORD,
//! SESSION_KEY (at least 64 bytes; random per process when unset), SECURE_COOKIES (true/false).

use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use champions_league_web::logic::views::{
    bracket_team_name, competition_stats, fixtures_for_matchday, match_history, matchdays,
    qualification_status, stage_label, stage_status, team_name, top_group_leaders, HistoryFilter,
    QualificationStatus,
};
use champions_league_web::{
    add_team, configure_group_count, generate_fixtures, get_qualified_teams, import_teams_csv,
    recalculate_standings, remove_team, reset_competition, seed_round_of_16, set_stage,
    submit_score, AdminError, AdminSession, CompetitionManager, CompetitionStage, GameMatch,
    GroupStanding, JsonFileStore, MatchOutcome, ScoreTarget, TeamId,
};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// The one competition, shared by all requests. Each request holds the lock for
/// its whole command, so mutations never interleave.
type AppState = Data<RwLock<CompetitionManager>>;

/// Session entry holding the admin login.
const ADMIN_SESSION_KEY: &str = "admin";

/// Group leaders shown on the overview.
const TOP_LEADERS: usize = 4;

/// Server settings, read once from the environment.
struct ServerConfig {
    host: String,
    port: u16,
    data_path: String,
    admin_username: String,
    admin_password: String,
    session_key: Option<String>,
    secure_cookies: bool,
}

impl ServerConfig {
    fn from_env() -> Self {
        let var = |name: &str, default: fn() -> String| std::env::var(name).unwrap_or_else(|_| default());
        Self {
            host: var("HOST", default_host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_port),
            data_path: var("DATA_PATH", default_data_path),
            admin_username: var("ADMIN_USERNAME", default_admin),
            admin_password: var("ADMIN_PASSWORD", default_admin),
            session_key: std::env::var("SESSION_KEY").ok(),
            secure_cookies: std::env::var("SECURE_COOKIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    /// Cookie signing key. Falls back to a random key, which logs everyone out on restart.
    fn cookie_key(&self) -> Key {
        match self.session_key.as_deref().map(|k| Key::try_from(k.as_bytes())) {
            Some(Ok(key)) => key,
            Some(Err(_)) => {
                log::warn!("SESSION_KEY is shorter than 64 bytes, using a random key");
                Key::generate()
            }
            None => Key::generate(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_path() -> String {
    "champions-league-data.json".to_string()
}

fn default_admin() -> String {
    "admin".to_string()
}

/// Username/password accepted by the login route.
struct AdminCredentials {
    username: String,
    password: String,
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct AddTeamBody {
    name: String,
    group: String,
}

#[derive(Deserialize)]
struct SubmitScoreBody {
    #[serde(flatten)]
    target: ScoreTarget,
    home_score: u32,
    away_score: u32,
}

#[derive(Deserialize)]
struct GroupCountBody {
    count: usize,
}

#[derive(Deserialize)]
struct StageBody {
    stage: CompetitionStage,
}

#[derive(Deserialize)]
struct HistoryQuery {
    #[serde(default)]
    filter: HistoryFilter,
}

/// Path segment: team id (e.g. /api/admin/teams/{team_id})
#[derive(Deserialize)]
struct TeamPath {
    team_id: TeamId,
}

/// Path segment: matchday (e.g. /api/competition/fixtures/{matchday})
#[derive(Deserialize)]
struct MatchdayPath {
    matchday: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryEntry<'a> {
    #[serde(flatten)]
    game: &'a GameMatch,
    label: String,
    home_team_name: &'a str,
    away_team_name: &'a str,
    outcome: Option<MatchOutcome>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StandingRow<'a> {
    #[serde(flatten)]
    standing: &'a GroupStanding,
    status: QualificationStatus,
    status_label: &'static str,
}

#[derive(Serialize)]
struct GroupTable<'a> {
    name: &'a str,
    standings: Vec<StandingRow<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BracketTie<'a> {
    id: &'a str,
    home_team: TeamId,
    away_team: TeamId,
    home_team_name: &'a str,
    away_team_name: &'a str,
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Admin login required" }))
}

fn error_response(e: &AdminError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        AdminError::TeamNotFound(_) | AdminError::MatchNotFound(_) | AdminError::GroupNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        AdminError::Storage(_) => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

/// A valid, unexpired admin login is stored in the session cookie.
fn is_admin(session: &Session) -> bool {
    session
        .get::<AdminSession>(ADMIN_SESSION_KEY)
        .ok()
        .flatten()
        .is_some_and(|s| s.is_valid())
}

/// Run an admin action under the write lock and answer with the resulting state.
fn run_admin<T>(
    state: &AppState,
    session: &Session,
    action: impl FnOnce(&mut CompetitionManager) -> Result<T, AdminError>,
) -> HttpResponse {
    if !is_admin(session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match action(&mut *g) {
        Ok(_) => HttpResponse::Ok().json(g.state()),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "champions-league-web",
    })
}

/// Full competition state.
#[get("/api/competition")]
async fn api_get_competition(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(g) => HttpResponse::Ok().json(g.state()),
        Err(_) => lock_error(),
    }
}

/// Matchdays that have group fixtures.
#[get("/api/competition/fixtures")]
async fn api_matchdays(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(serde_json::json!({ "matchdays": matchdays(&g.state().matches) }))
}

/// Group fixtures of one matchday, keyed by group.
#[get("/api/competition/fixtures/{matchday}")]
async fn api_fixtures_for_matchday(state: AppState, path: Path<MatchdayPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(fixtures_for_matchday(&g.state().matches, path.matchday))
}

/// Completed matches, latest first (?filter=all|group|knockout).
#[get("/api/competition/history")]
async fn api_match_history(state: AppState, query: Query<HistoryQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let competition = g.state();
    let entries: Vec<HistoryEntry> = match_history(&competition.matches, query.filter)
        .into_iter()
        .map(|m| HistoryEntry {
            game: m,
            label: stage_label(m),
            home_team_name: team_name(competition, m.home_team),
            away_team_name: team_name(competition, m.away_team),
            outcome: m.outcome(),
        })
        .collect();
    HttpResponse::Ok().json(entries)
}

/// Group tables with the qualification zone of each position.
#[get("/api/competition/standings")]
async fn api_standings(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let tables: Vec<GroupTable> = g
        .state()
        .groups
        .iter()
        .map(|group| GroupTable {
            name: &group.name,
            standings: group
                .standings
                .iter()
                .map(|s| {
                    let status = qualification_status(s.position);
                    StandingRow {
                        standing: s,
                        status,
                        status_label: status.label(),
                    }
                })
                .collect(),
        })
        .collect();
    HttpResponse::Ok().json(tables)
}

#[get("/api/competition/qualified")]
async fn api_qualified(state: AppState) -> HttpResponse {
    match state.read() {
        Ok(g) => HttpResponse::Ok().json(get_qualified_teams(&g.state().groups)),
        Err(_) => lock_error(),
    }
}

/// Round-of-16 ties with team names ("TBD" for unknown teams).
#[get("/api/competition/knockout")]
async fn api_knockout(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let competition = g.state();
    let ties: Vec<BracketTie> = competition
        .knockout_pairings
        .iter()
        .map(|p| BracketTie {
            id: &p.id,
            home_team: p.home_team,
            away_team: p.away_team,
            home_team_name: bracket_team_name(competition, p.home_team),
            away_team_name: bracket_team_name(competition, p.away_team),
        })
        .collect();
    HttpResponse::Ok().json(ties)
}

/// Overview: stage headline, counters and group leaders.
#[get("/api/competition/stats")]
async fn api_stats(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let competition = g.state();
    HttpResponse::Ok().json(serde_json::json!({
        "stage": competition.current_stage,
        "stageStatus": stage_status(competition.current_stage),
        "stats": competition_stats(competition),
        "topTeams": top_group_leaders(competition, TOP_LEADERS),
    }))
}

#[post("/api/admin/login")]
async fn api_login(
    session: Session,
    credentials: Data<AdminCredentials>,
    body: Json<LoginBody>,
) -> HttpResponse {
    if body.username != credentials.username || body.password != credentials.password {
        log::warn!("Rejected admin login for {}", body.username);
        return HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Invalid credentials" }));
    }
    match session.insert(ADMIN_SESSION_KEY, AdminSession::login_at(chrono::Utc::now())) {
        Ok(()) => {
            log::info!("Admin logged in");
            HttpResponse::Ok().json(serde_json::json!({ "loggedIn": true }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })),
    }
}

#[post("/api/admin/logout")]
async fn api_logout(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(serde_json::json!({ "loggedIn": false }))
}

#[get("/api/admin/session")]
async fn api_session(session: Session) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "loggedIn": is_admin(&session) }))
}

#[post("/api/admin/teams")]
async fn api_add_team(state: AppState, session: Session, body: Json<AddTeamBody>) -> HttpResponse {
    run_admin(&state, &session, |m| add_team(m, &body.name, &body.group))
}

/// Remove a team and every match it plays in.
#[delete("/api/admin/teams/{team_id}")]
async fn api_remove_team(state: AppState, session: Session, path: Path<TeamPath>) -> HttpResponse {
    run_admin(&state, &session, |m| remove_team(m, path.team_id))
}

/// Bulk import: request body is CSV with `name,group` rows.
#[post("/api/admin/teams/import")]
async fn api_import_teams(state: AppState, session: Session, body: String) -> HttpResponse {
    run_admin(&state, &session, |m| import_teams_csv(m, body.as_bytes()))
}

/// Replace all matches with a fresh group stage schedule.
#[post("/api/admin/fixtures")]
async fn api_generate_fixtures(state: AppState, session: Session) -> HttpResponse {
    run_admin(&state, &session, generate_fixtures)
}

/// Record a score by match id or by home/away team ids.
#[put("/api/admin/scores")]
async fn api_submit_score(state: AppState, session: Session, body: Json<SubmitScoreBody>) -> HttpResponse {
    run_admin(&state, &session, |m| {
        submit_score(m, body.target, body.home_score, body.away_score)
    })
}

#[post("/api/admin/standings/recalculate")]
async fn api_recalculate(state: AppState, session: Session) -> HttpResponse {
    run_admin(&state, &session, recalculate_standings)
}

#[post("/api/admin/reset")]
async fn api_reset(state: AppState, session: Session) -> HttpResponse {
    run_admin(&state, &session, reset_competition)
}

/// Resize the number of groups (1-26).
#[put("/api/admin/groups")]
async fn api_configure_groups(state: AppState, session: Session, body: Json<GroupCountBody>) -> HttpResponse {
    run_admin(&state, &session, |m| configure_group_count(m, body.count))
}

#[put("/api/admin/stage")]
async fn api_set_stage(state: AppState, session: Session, body: Json<StageBody>) -> HttpResponse {
    run_admin(&state, &session, |m| set_stage(m, body.stage))
}

/// Seed the Round of 16 from the current group tables.
#[post("/api/admin/knockout/generate")]
async fn api_seed_knockout(state: AppState, session: Session) -> HttpResponse {
    run_admin(&state, &session, seed_round_of_16)
}

fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(secure)
        .build()
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_get_competition)
        .service(api_matchdays)
        .service(api_fixtures_for_matchday)
        .service(api_match_history)
        .service(api_standings)
        .service(api_qualified)
        .service(api_knockout)
        .service(api_stats)
        .service(api_login)
        .service(api_logout)
        .service(api_session)
        .service(api_import_teams)
        .service(api_add_team)
        .service(api_remove_team)
        .service(api_generate_fixtures)
        .service(api_submit_score)
        .service(api_recalculate)
        .service(api_reset)
        .service(api_configure_groups)
        .service(api_set_stage)
        .service(api_seed_knockout);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let store = JsonFileStore::new(&config.data_path);
    log::info!("Competition data file: {}", store.path().display());
    let manager = CompetitionManager::new(Box::new(store));
    let state = Data::new(RwLock::new(manager));
    let credentials = Data::new(AdminCredentials {
        username: config.admin_username.clone(),
        password: config.admin_password.clone(),
    });
    let key = config.cookie_key();
    let secure = config.secure_cookies;

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(credentials.clone())
            .wrap(session_middleware(key.clone(), secure))
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
