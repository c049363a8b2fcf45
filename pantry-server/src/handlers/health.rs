use actix_web::{web, HttpResponse, Responder};
use pantry_common::db::DbAsyncPool;
use serde::Deserialize;
use serde_json::json;

use crate::env;

#[derive(Deserialize)]
pub struct HealthKeyQuery {
    pub key: Option<String>,
}

pub async fn heartbeat() -> impl Responder {
    HttpResponse::Ok()
}

pub async fn health(
    db_async_pool: web::Data<DbAsyncPool>,
    query: web::Query<HealthKeyQuery>,
) -> impl Responder {
    if !is_health_key_correct(query.key.as_deref()) {
        return HttpResponse::Unauthorized().finish();
    }

    let async_pool_state = db_async_pool.state();
    let resp_body = json!({
        "db_async_pool_state": {
            "connections": async_pool_state.connections,
            "idle_connections": async_pool_state.idle_connections
        }
    });

    HttpResponse::Ok().json(resp_body)
}

#[inline]
fn is_health_key_correct(key: Option<&str>) -> bool {
    let Some(key) = key else {
        return false;
    };

    let correct_key = env::CONF.health_endpoint_key.as_bytes();
    let key = key.as_bytes();

    if correct_key.len() != key.len() || key.is_empty() {
        return false;
    }

    // Do bitwise comparison to prevent timing attacks
    let mut keys_dont_match = 0u8;

    for (correct_key_byte, key_byte) in correct_key.iter().zip(key.iter()) {
        keys_dont_match |= correct_key_byte ^ key_byte;
    }

    keys_dont_match == 0
}
