// proxy/catalog.rs - Every forwarded route, one entry each
//
// Route Prefix: /api/<resource> → backend /<resource>
// Public entries are pre-authentication (login, register, password reset);
// everything else needs a credential and forwards it.

use super::validate::{NOTE_TEXT_LENGTH, TITLE_LENGTH};
use super::{Fallback, RouteSpec, Shape};

const ACCOUNT_USER: &[&str] = &["accountId", "userId"];

pub fn catalog() -> Vec<RouteSpec> {
    let mut routes = Vec::new();
    routes.extend(auth_routes());
    routes.extend(account_routes());
    routes.extend(task_routes());
    routes.extend(event_routes());
    routes.extend(note_routes());
    routes.extend(file_routes());
    routes.extend(tile_routes());
    routes.extend(contact_routes());
    routes.extend(provider_routes());
    routes.extend(user_routes());
    routes.extend(calendar_routes());
    routes.extend(stats_routes());
    routes
}

fn auth_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::post("auth.login", "/api/auth/login", "/auth/login")
            .public()
            .require_body(&["email", "password"])
            .shape(Shape::Session),
        RouteSpec::post("auth.register", "/api/auth/register", "/auth/register")
            .public()
            .require_body(&["email", "password"])
            .shape(Shape::Session),
        RouteSpec::post("auth.forgot_password", "/api/auth/forgot-password", "/auth/forgot-password")
            .public()
            .require_body(&["email"]),
        RouteSpec::post("auth.reset_password", "/api/auth/reset-password", "/auth/reset-password")
            .public()
            .require_body(&["token", "password"]),
        RouteSpec::post("auth.refresh", "/api/auth/refresh", "/auth/refresh")
            .public()
            .require_body(&["refreshToken"]),
        RouteSpec::get("auth.me", "/api/auth/me", "/auth/me")
            .retry_later_when_unreachable()
            .shape(Shape::Profile),
    ]
}

fn account_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::get("accounts.list", "/api/accounts", "/accounts").require_query(&["userId"]),
        RouteSpec::post("accounts.create", "/api/accounts", "/accounts").require_body(&["name"]),
        RouteSpec::get("accounts.show", "/api/accounts/:accountId", "/accounts/{accountId}"),
        RouteSpec::put("accounts.update", "/api/accounts/:accountId", "/accounts/{accountId}"),
        RouteSpec::delete("accounts.delete", "/api/accounts/:accountId", "/accounts/{accountId}"),
        RouteSpec::get(
            "accounts.members",
            "/api/accounts/:accountId/members",
            "/accounts/{accountId}/members",
        ),
    ]
}

fn task_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::get("tasks.list", "/api/tasks", "/tasks")
            .require_query(ACCOUNT_USER)
            .query(&["status"])
            .fallback(Fallback::Tasks),
        RouteSpec::post("tasks.create", "/api/tasks", "/tasks")
            .require_body(&["title", "accountId", "userId"])
            .limit(TITLE_LENGTH),
        RouteSpec::get("tasks.show", "/api/tasks/:taskId", "/tasks/{taskId}").query(ACCOUNT_USER),
        RouteSpec::put("tasks.update", "/api/tasks/:taskId", "/tasks/{taskId}")
            .query(ACCOUNT_USER)
            .limit(TITLE_LENGTH),
        RouteSpec::delete("tasks.delete", "/api/tasks/:taskId", "/tasks/{taskId}").query(ACCOUNT_USER),
        RouteSpec::patch("tasks.status", "/api/tasks/:taskId/status", "/tasks/{taskId}/status")
            .require_body(&["status"]),
    ]
}

fn event_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::get("events.list", "/api/events", "/events")
            .require_query(ACCOUNT_USER)
            .query(&["from", "to"]),
        RouteSpec::post("events.create", "/api/events", "/events")
            .require_body(&["title", "startTime", "accountId", "userId"])
            .limit(TITLE_LENGTH),
        RouteSpec::get("events.show", "/api/events/:eventId", "/events/{eventId}").query(ACCOUNT_USER),
        RouteSpec::put("events.update", "/api/events/:eventId", "/events/{eventId}")
            .query(ACCOUNT_USER)
            .limit(TITLE_LENGTH),
        RouteSpec::delete("events.delete", "/api/events/:eventId", "/events/{eventId}").query(ACCOUNT_USER),
    ]
}

fn note_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::get("notes.list", "/api/notes", "/notes").require_query(ACCOUNT_USER),
        RouteSpec::post("notes.create", "/api/notes", "/notes")
            .require_body(&["text", "accountId", "userId"])
            .limit(NOTE_TEXT_LENGTH),
        RouteSpec::get("notes.show", "/api/notes/:noteId", "/notes/{noteId}").query(ACCOUNT_USER),
        RouteSpec::put("notes.update", "/api/notes/:noteId", "/notes/{noteId}")
            .query(ACCOUNT_USER)
            .limit(NOTE_TEXT_LENGTH),
        RouteSpec::delete("notes.delete", "/api/notes/:noteId", "/notes/{noteId}").query(ACCOUNT_USER),
    ]
}

fn file_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::get("files.list", "/api/files", "/files").require_query(ACCOUNT_USER),
        RouteSpec::post("files.upload", "/api/files", "/files")
            .multipart()
            .require_body(&["file", "accountId", "userId"]),
        RouteSpec::get("files.show", "/api/files/:fileId", "/files/{fileId}"),
        RouteSpec::delete("files.delete", "/api/files/:fileId", "/files/{fileId}"),
        RouteSpec::get("files.content", "/api/files/:fileId/content", "/files/{fileId}/content")
            .shape(Shape::Binary),
    ]
}

fn tile_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::get("tiles.list", "/api/tiles", "/tiles")
            .require_query(ACCOUNT_USER)
            .shape(Shape::Tiles)
            .fallback(Fallback::Tiles),
        RouteSpec::post("tiles.create", "/api/tiles", "/tiles").shape(Shape::Tiles),
        RouteSpec::put("tiles.update", "/api/tiles/:tileId", "/tiles/{tileId}").shape(Shape::Tiles),
        RouteSpec::delete("tiles.delete", "/api/tiles/:tileId", "/tiles/{tileId}"),
    ]
}

fn contact_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::get("contacts.list", "/api/contacts", "/contacts")
            .require_query(&["accountId"])
            .shape(Shape::Contacts),
        RouteSpec::post("contacts.create", "/api/contacts", "/contacts").shape(Shape::Contacts),
        RouteSpec::get("contacts.show", "/api/contacts/:contactId", "/contacts/{contactId}").shape(Shape::Contacts),
        RouteSpec::put("contacts.update", "/api/contacts/:contactId", "/contacts/{contactId}").shape(Shape::Contacts),
        RouteSpec::delete("contacts.delete", "/api/contacts/:contactId", "/contacts/{contactId}"),
    ]
}

fn provider_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::get("providers.list", "/api/providers", "/providers").require_query(&["userId"]),
        RouteSpec::delete("providers.delete", "/api/providers/:providerId", "/providers/{providerId}"),
    ]
}

fn user_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::get("users.show", "/api/users/:userId", "/users/{userId}"),
        RouteSpec::put("users.update", "/api/users/:userId", "/users/{userId}"),
    ]
}

fn calendar_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::get("calendars.list", "/api/calendars", "/calendars")
            .calendar()
            .require_query(&["userId"]),
        RouteSpec::post("calendars.sync", "/api/calendars/sync", "/calendars/sync")
            .calendar()
            .require_body(&["userId"]),
        RouteSpec::get("calendars.colors", "/api/calendars/colors", "/colors")
            .calendar()
            .shape(Shape::Binary),
    ]
}

fn stats_routes() -> Vec<RouteSpec> {
    vec![RouteSpec::get("stats.summary", "/api/stats", "/stats").require_query(ACCOUNT_USER)]
}
