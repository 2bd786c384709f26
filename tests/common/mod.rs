use serde::Serialize;
use std::path::{Path, PathBuf};

/// Fixture feedback export covering May 2024: mixed timestamp shapes, an
/// invalid rating, an out-of-window record, and an unparseable date.
#[allow(dead_code)]
pub fn write_records_fixture(dir: &Path) -> PathBuf {
  let records = serde_json::json!([
    {
      "id": "fb-1",
      "user_id": "u-1",
      "user_email": "ana@campus.edu",
      "service_id": "svc-enroll",
      "service_name": "Enrollment",
      "step": 2,
      "rating": 5,
      "comment": "clear instructions, thank you",
      "created_at": "2024-05-10T09:30:00"
    },
    {
      "id": "fb-2",
      "user_id": "u-2",
      "user_email": "a.very.long.student.address@graduate.school.campus.edu",
      "service_id": "svc-housing",
      "service_name": "Housing",
      "step": 1,
      "rating": 4,
      "comment": "the second step took a while to verify",
      "created_at": "05/15/24, 02:30:00 PM"
    },
    {
      "id": "fb-3",
      "user_id": null,
      "user_email": null,
      "service_id": "svc-enroll",
      "service_name": "Enrollment",
      "rating": 3,
      "created_at": 1715333400000u64
    },
    {
      "id": "fb-4",
      "user_email": "lee@campus.edu",
      "service_id": "svc-housing",
      "service_name": "Housing",
      "rating": 0,
      "comment": "rating widget was broken",
      "created_at": "2024-05-20T10:00:00"
    },
    {
      "id": "fb-5",
      "user_email": "april@campus.edu",
      "service_id": "svc-enroll",
      "service_name": "Enrollment",
      "rating": 5,
      "created_at": "2024-04-30T23:59:59"
    },
    {
      "id": "fb-6",
      "user_email": "mystery@campus.edu",
      "service_id": "svc-enroll",
      "service_name": "Enrollment",
      "rating": 5,
      "created_at": "not-a-date"
    }
  ]);

  let path = dir.join("records.json");
  std::fs::write(&path, serde_json::to_vec_pretty(&records).unwrap()).unwrap();
  path
}

#[derive(Serialize)]
struct TokenClaims {
  role: String,
  email: String,
  sub: String,
  exp: i64,
}

#[allow(dead_code)]
pub fn mint_token(role: &str) -> String {
  let claims = TokenClaims {
    role: role.to_string(),
    email: "someone@campus.edu".to_string(),
    sub: "u-1".to_string(),
    exp: 4_102_444_800,
  };
  jsonwebtoken::encode(
    &jsonwebtoken::Header::default(),
    &claims,
    &jsonwebtoken::EncodingKey::from_secret(b"fixture-secret"),
  )
  .unwrap()
}

#[allow(dead_code)]
pub fn write_session(dir: &Path, token: Option<&str>) -> PathBuf {
  let path = dir.join("session.json");
  let mut values = serde_json::Map::new();
  if let Some(t) = token {
    values.insert("token".to_string(), serde_json::Value::String(t.to_string()));
  }
  std::fs::write(&path, serde_json::to_vec_pretty(&serde_json::Value::Object(values)).unwrap()).unwrap();
  path
}
