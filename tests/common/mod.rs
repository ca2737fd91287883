//! In-process fakes of the primary service, the consumer and the catalog.
//!
//! Each fake is a `tiny_http` server on an ephemeral port served from a
//! background thread. State is shared through `Arc<Mutex<_>>` so tests can
//! seed and inspect it.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::{
    collections::HashSet,
    io::Read,
    net::TcpListener,
    sync::{Arc, Mutex},
    thread,
};
use tiny_http::{Header, Request, Response, Server};

#[derive(Debug, Clone)]
pub struct StoredTrainer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    pub trainers: Vec<StoredTrainer>,
    pub types: Vec<(i64, String)>,
    pub creatures: Vec<Value>,
    pub captures: Vec<Value>,
    sessions: HashSet<String>,
    /// Catalog numbers answered with 404
    pub missing_catalog: HashSet<u32>,
    pub catalog_hits: usize,
    /// Create types but answer without an id
    pub hide_type_ids: bool,
    /// Bad credentials answered with 500 instead of 401
    pub bad_login_500: bool,
    /// Every registration answered with 400
    pub refuse_register: bool,
}

impl Store {
    fn next(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn new_session(&mut self) -> String {
        let token = format!("JSESSIONID=s{}", self.next());
        self.sessions.insert(token.clone());
        token
    }
}

pub struct FakeService {
    pub url: String,
    pub store: Arc<Mutex<Store>>,
}

impl FakeService {
    /// Primary service under `/api`, catalog under `/catalog`.
    pub fn start() -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let store = Arc::new(Mutex::new(Store::default()));
        let shared = Arc::clone(&store);
        thread::spawn(move || {
            for rq in server.incoming_requests() {
                handle(rq, &shared);
            }
        });
        FakeService {
            url: format!("http://{}", addr),
            store,
        }
    }

    pub fn primary_url(&self) -> String {
        format!("{}/api", self.url)
    }

    pub fn catalog_url(&self) -> String {
        format!("{}/catalog", self.url)
    }

    pub fn with_store<T>(&self, f: impl FnOnce(&mut Store) -> T) -> T {
        f(&mut self.store.lock().unwrap())
    }

    pub fn add_trainer(&self, name: &str, email: &str, password: &str) -> i64 {
        self.with_store(|s| {
            let id = s.next();
            s.trainers.push(StoredTrainer {
                id,
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            });
            id
        })
    }
}

/// Consumer fake answering every read endpoint with canned data.
pub fn start_consumer() -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    thread::spawn(move || {
        for rq in server.incoming_requests() {
            let path = rq.url().split('?').next().unwrap_or("").to_string();
            let body = match path.as_str() {
                "/api/captures" => json!([{
                    "trainerId": 1, "trainerName": "Ash Ketchum",
                    "pokemonId": 25, "pokemonName": "Pikachu",
                    "captureDate": "2024-01-01T10:00:00"
                }]),
                "/api/captures/recent" => json!([]),
                "/api/captures/stats" => json!({"totalMessages": 1, "maxMessages": 100}),
                "/api/creations" => json!([{"trainerId": 1, "name": "Ash Ketchum"}]),
                "/api/aggregated/stats" => json!([{
                    "trainerId": 1, "trainerName": "Ash Ketchum", "totalCaptures": 1,
                    "pokemonCounts": [{"pokemonId": 25, "count": 1}]
                }]),
                "/api/aggregated/stats/trainer/1" => json!({
                    "trainerId": 1, "trainerName": "Ash Ketchum", "totalCaptures": 1,
                    "pokemonCounts": []
                }),
                _ => {
                    let _ = rq.respond(Response::from_string("").with_status_code(404));
                    continue;
                }
            };
            let _ = rq.respond(json_response(200, &body));
        }
    });
    format!("http://{}/api", addr)
}

/// A URL nothing listens on.
pub fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

fn json_response(status: u16, body: &Value) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body.to_string())
        .with_status_code(status)
        .with_header(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap())
}

fn with_cookie(
    resp: Response<std::io::Cursor<Vec<u8>>>,
    token: &str,
) -> Response<std::io::Cursor<Vec<u8>>> {
    let value = format!("{}; Path=/api; HttpOnly", token);
    resp.with_header(Header::from_bytes(&b"Set-Cookie"[..], value.as_bytes()).unwrap())
}

fn session_of(rq: &Request) -> Option<String> {
    rq.headers()
        .iter()
        .find(|h| h.field.equiv("Cookie"))
        .map(|h| h.value.as_str().trim().to_string())
}

fn catalog_record(n: u32) -> Value {
    json!({
        "id": n,
        "name": format!("mon{}", n),
        "stats": [
            {"base_stat": 40 + n, "effort": 0, "stat": {"name": "hp"}},
            {"base_stat": 50 + n, "effort": 0, "stat": {"name": "attack"}},
            {"base_stat": 30 + n, "effort": 0, "stat": {"name": "defense"}},
            {"base_stat": 99, "effort": 0, "stat": {"name": "special-attack"}},
            {"base_stat": 60 + n, "effort": 0, "stat": {"name": "speed"}}
        ],
        "types": [{"slot": 1, "type": {"name": "fire"}}]
    })
}

fn public_trainer(t: &StoredTrainer) -> Value {
    json!({"id": t.id, "name": t.name, "email": t.email})
}

fn by_id(list: &[Value], id: i64) -> Option<&Value> {
    list.iter().find(|v| v["id"].as_i64() == Some(id))
}

fn handle(mut rq: Request, store: &Arc<Mutex<Store>>) {
    let method = rq.method().as_str().to_string();
    let path = rq.url().split('?').next().unwrap_or("").to_string();
    let mut raw = String::new();
    let _ = rq.as_reader().read_to_string(&mut raw);
    let body: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);
    let cookie = session_of(&rq);

    let mut s = store.lock().unwrap();
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    let resp = match (method.as_str(), segments.as_slice()) {
        ("GET", ["catalog", "pokemon", n]) => {
            s.catalog_hits += 1;
            match n.parse::<u32>() {
                Ok(n) if !s.missing_catalog.contains(&n) => json_response(200, &catalog_record(n)),
                _ => Response::from_string("Not Found").with_status_code(404),
            }
        }
        ("POST", ["api", "auth", "login"]) => {
            let email = body["email"].as_str().unwrap_or_default();
            let password = body["password"].as_str().unwrap_or_default();
            let found = s
                .trainers
                .iter()
                .find(|t| t.email == email && t.password == password)
                .cloned();
            match found {
                Some(t) => {
                    let token = s.new_session();
                    with_cookie(
                        json_response(
                            200,
                            &json!({"trainerId": t.id, "name": t.name, "email": t.email}),
                        ),
                        &token,
                    )
                }
                None if s.bad_login_500 => Response::from_string("Internal Server Error")
                    .with_status_code(500),
                None => json_response(401, &json!({"error": "Invalid credentials"})),
            }
        }
        ("POST", ["api", "auth", "register"]) => {
            let email = body["email"].as_str().unwrap_or_default().to_string();
            if s.refuse_register {
                json_response(400, &json!({"error": "Registration closed"}))
            } else if email.is_empty() || s.trainers.iter().any(|t| t.email == email) {
                json_response(409, &json!({"error": "Email already used"}))
            } else {
                let id = s.next();
                let t = StoredTrainer {
                    id,
                    name: body["name"].as_str().unwrap_or_default().to_string(),
                    email,
                    password: body["password"].as_str().unwrap_or_default().to_string(),
                };
                let reply = public_trainer(&t);
                s.trainers.push(t);
                let token = s.new_session();
                with_cookie(json_response(201, &reply), &token)
            }
        }
        (_, ["api", ..]) if !cookie.as_ref().is_some_and(|c| s.sessions.contains(c)) => {
            json_response(401, &json!({"error": "Not authenticated"}))
        }
        ("GET", ["api", "trainers"]) => {
            let list: Vec<Value> = s.trainers.iter().map(public_trainer).collect();
            json_response(200, &Value::Array(list))
        }
        ("GET", ["api", "trainers", id]) => {
            let id = id.parse::<i64>().unwrap_or(-1);
            match s.trainers.iter().find(|t| t.id == id) {
                Some(t) => json_response(200, &public_trainer(t)),
                None => json_response(404, &json!({"error": "Trainer not found"})),
            }
        }
        ("GET", ["api", "trainers", id, "stats"]) => {
            let id = id.parse::<i64>().unwrap_or(-1);
            let mine: Vec<&Value> = s
                .captures
                .iter()
                .filter(|c| c["trainerId"].as_i64() == Some(id))
                .collect();
            let unique: HashSet<i64> = mine
                .iter()
                .filter_map(|c| c["pokemonId"].as_i64())
                .collect();
            json_response(
                200,
                &json!({
                    "trainerId": id,
                    "totalCaptures": mine.len(),
                    "uniquePokemons": unique.len(),
                    "pokedexCompletionPercentage": unique.len() as f64 * 100.0 / 151.0
                }),
            )
        }
        ("DELETE", ["api", "trainers", id]) => {
            let id = id.parse::<i64>().unwrap_or(-1);
            let before = s.trainers.len();
            s.trainers.retain(|t| t.id != id);
            if s.trainers.len() < before {
                Response::from_string("").with_status_code(204)
            } else {
                json_response(404, &json!({"error": "Trainer not found"}))
            }
        }
        ("GET", ["api", "types"]) => {
            let list: Vec<Value> = s
                .types
                .iter()
                .map(|(id, name)| json!({"id": id, "name": name}))
                .collect();
            json_response(200, &Value::Array(list))
        }
        ("POST", ["api", "types"]) => {
            let name = body["name"].as_str().unwrap_or_default().to_string();
            if s.types.iter().any(|(_, n)| *n == name) {
                json_response(409, &json!({"error": "Type exists"}))
            } else {
                let id = s.next();
                s.types.push((id, name.clone()));
                if s.hide_type_ids {
                    Response::from_string("created").with_status_code(201)
                } else {
                    json_response(201, &json!({"id": id, "name": name}))
                }
            }
        }
        ("GET", ["api", "types", id]) => {
            let id = id.parse::<i64>().unwrap_or(-1);
            match s.types.iter().find(|(i, _)| *i == id) {
                Some((i, n)) => json_response(200, &json!({"id": i, "name": n})),
                None => json_response(404, &json!({"error": "Type not found"})),
            }
        }
        ("DELETE", ["api", "types", id]) => {
            let id = id.parse::<i64>().unwrap_or(-1);
            s.types.retain(|(i, _)| *i != id);
            Response::from_string("").with_status_code(204)
        }
        ("GET", ["api", "pokemons"]) => json_response(200, &Value::Array(s.creatures.clone())),
        ("POST", ["api", "pokemons", "compare"]) => {
            let ids: Vec<i64> = body
                .as_array()
                .map(|a| a.iter().filter_map(Value::as_i64).collect())
                .unwrap_or_default();
            let picked: Vec<Value> = ids
                .iter()
                .filter_map(|id| by_id(&s.creatures, *id).cloned())
                .collect();
            let hp: Vec<f64> = picked.iter().filter_map(|p| p["hp"].as_f64()).collect();
            let avg = hp.iter().sum::<f64>() / hp.len().max(1) as f64;
            let min_attack = picked.iter().filter_map(|p| p["attack"].as_i64()).min();
            let max_defense = picked.iter().filter_map(|p| p["defense"].as_i64()).max();
            json_response(
                200,
                &json!({
                    "pokemons": picked,
                    "stats": {"avgHp": avg, "minAttack": min_attack, "maxDefense": max_defense}
                }),
            )
        }
        ("POST", ["api", "pokemons"]) => {
            let id = s.next();
            let mut record = body.clone();
            record["id"] = json!(id);
            s.creatures.push(record.clone());
            json_response(201, &record)
        }
        ("GET", ["api", "pokemons", id]) => {
            let id = id.parse::<i64>().unwrap_or(-1);
            match by_id(&s.creatures, id) {
                Some(p) => json_response(200, p),
                None => json_response(404, &json!({"error": "Pokemon not found"})),
            }
        }
        ("DELETE", ["api", "pokemons", id]) => {
            let id = id.parse::<i64>().unwrap_or(-1);
            s.creatures.retain(|p| p["id"].as_i64() != Some(id));
            Response::from_string("").with_status_code(204)
        }
        ("GET", ["api", "caught-pokemons"]) => {
            json_response(200, &Value::Array(s.captures.clone()))
        }
        ("POST", ["api", "caught-pokemons"]) => {
            let id = s.next();
            let record = json!({
                "id": id,
                "trainerId": body["trainerId"],
                "pokemonId": body["pokemonId"],
                "captureDate": "2024-01-01T10:00:00"
            });
            s.captures.push(record.clone());
            json_response(201, &record)
        }
        ("GET", ["api", "caught-pokemons", "trainer", id]) => {
            let id = id.parse::<i64>().unwrap_or(-1);
            let list: Vec<Value> = s
                .captures
                .iter()
                .filter(|c| c["trainerId"].as_i64() == Some(id))
                .cloned()
                .collect();
            json_response(200, &Value::Array(list))
        }
        ("GET", ["api", "caught-pokemons", "pokemon", id]) => {
            let id = id.parse::<i64>().unwrap_or(-1);
            let list: Vec<Value> = s
                .captures
                .iter()
                .filter(|c| c["pokemonId"].as_i64() == Some(id))
                .cloned()
                .collect();
            json_response(200, &Value::Array(list))
        }
        ("GET", ["api", "caught-pokemons", id]) => {
            let id = id.parse::<i64>().unwrap_or(-1);
            match by_id(&s.captures, id) {
                Some(c) => json_response(200, c),
                None => json_response(404, &json!({"error": "Capture not found"})),
            }
        }
        ("DELETE", ["api", "caught-pokemons", id]) => {
            let id = id.parse::<i64>().unwrap_or(-1);
            s.captures.retain(|c| c["id"].as_i64() != Some(id));
            Response::from_string("").with_status_code(204)
        }
        _ => json_response(404, &json!({"error": "No route"})),
    };
    drop(s);
    let _ = rq.respond(resp);
}
