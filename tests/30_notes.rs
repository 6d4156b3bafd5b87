mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn notes_require_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for (method, path) in [
        ("GET", "/api/notes"),
        ("GET", "/api/notes/search?q=x"),
        ("POST", "/api/notes"),
        ("GET", "/api/notes/6dab2d46-9f7c-4b2a-9c9d-0f3b9a2f1a11"),
        ("PUT", "/api/notes/6dab2d46-9f7c-4b2a-9c9d-0f3b9a2f1a11"),
        ("DELETE", "/api/notes/6dab2d46-9f7c-4b2a-9c9d-0f3b9a2f1a11"),
    ] {
        let url = format!("{}{}", server.base_url, path);
        let req = match method {
            "GET" => client.get(&url),
            "POST" => client.post(&url).json(&json!({ "title": "T" })),
            "PUT" => client.put(&url).json(&json!({ "title": "T" })),
            "DELETE" => client.delete(&url),
            _ => unreachable!(),
        };
        let res = req.send().await?;
        assert_eq!(
            res.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should require a token",
            method,
            path
        );
        let body = res.json::<Value>().await?;
        assert_eq!(body["success"], false);
    }
    Ok(())
}

/// Full CRUD scenario against a provisioned database. Requires JOTTER_E2E=1
/// and DATABASE_URL; skipped otherwise.
#[tokio::test]
async fn notes_crud_scenario() -> Result<()> {
    if !common::e2e_enabled() {
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Unique emails per run; the table persists across runs
    let run_id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_nanos();
    let email_a = format!("a-{}@x.com", run_id);
    let email_b = format!("b-{}@x.com", run_id);

    // signup(email, "Test@1234", "A", "B") -> 201 with token
    let res = client
        .post(format!("{}/api/auth/signup", server.base_url))
        .json(&json!({
            "email": email_a,
            "password": "Test@1234",
            "firstName": "A",
            "lastName": "B"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    let token_a = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["user"]["email"], email_a);

    // Duplicate signup fails with the conflict convention (400)
    let res = client
        .post(format!("{}/api/auth/signup", server.base_url))
        .json(&json!({
            "email": email_a.to_uppercase(),
            "password": "Test@1234",
            "firstName": "A",
            "lastName": "B"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Email already registered");

    // create note {title:"T", content:"C"}
    let res = client
        .post(format!("{}/api/notes", server.base_url))
        .bearer_auth(&token_a)
        .json(&json!({ "title": "T", "content": "C" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    let note_id = body["data"]["id"].as_str().unwrap().to_string();

    // get by id returns title "T"
    let res = client
        .get(format!("{}/api/notes/{}", server.base_url, note_id))
        .bearer_auth(&token_a)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["title"], "T");
    assert_eq!(body["data"]["content"], "C");

    // search hits on content substring, case-insensitively
    let res = client
        .get(format!("{}/api/notes/search?q=c", server.base_url))
        .bearer_auth(&token_a)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    let hits = body["data"].as_array().unwrap();
    assert!(hits.iter().any(|n| n["id"] == note_id.as_str()));

    // update {title:"T2"} -> get returns "T2", content untouched
    let res = client
        .put(format!("{}/api/notes/{}", server.base_url, note_id))
        .bearer_auth(&token_a)
        .json(&json!({ "title": "T2" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["title"], "T2");
    assert_eq!(body["data"]["content"], "C");

    // user B can never see user A's note
    let res = client
        .post(format!("{}/api/auth/signup", server.base_url))
        .json(&json!({
            "email": email_b,
            "password": "Test@1234",
            "firstName": "B",
            "lastName": "C"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    let token_b = body["data"]["token"].as_str().unwrap().to_string();

    for request in [
        client
            .get(format!("{}/api/notes/{}", server.base_url, note_id))
            .bearer_auth(&token_b),
        client
            .put(format!("{}/api/notes/{}", server.base_url, note_id))
            .bearer_auth(&token_b)
            .json(&json!({ "title": "stolen" })),
        client
            .delete(format!("{}/api/notes/{}", server.base_url, note_id))
            .bearer_auth(&token_b),
    ] {
        let res = request.send().await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    // delete -> message envelope
    let res = client
        .delete(format!("{}/api/notes/{}", server.base_url, note_id))
        .bearer_auth(&token_a)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Note deleted successfully");

    // deleted note behaves like a never-existing id
    for request in [
        client
            .get(format!("{}/api/notes/{}", server.base_url, note_id))
            .bearer_auth(&token_a),
        client
            .put(format!("{}/api/notes/{}", server.base_url, note_id))
            .bearer_auth(&token_a)
            .json(&json!({ "title": "T3" })),
        client
            .delete(format!("{}/api/notes/{}", server.base_url, note_id))
            .bearer_auth(&token_a),
    ] {
        let res = request.send().await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = res.json::<Value>().await?;
        assert_eq!(body["message"], "Note not found");
    }

    // and it no longer shows up in list or search
    let res = client
        .get(format!("{}/api/notes", server.base_url))
        .bearer_auth(&token_a)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|n| n["id"] != note_id.as_str()));

    Ok(())
}
