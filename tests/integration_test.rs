//! Integration tests for the HTTP surface.
//!
//! Handlers are called directly against a catalog written to a temp dir;
//! the blog feed proxy is pointed at a local axum server.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde_json::Value;

use wals_web::api;
use wals_web::config::Config;
use wals_web::models::{BlogFeedQuery, LanguoidQuery};
use wals_web::olac::OaiRequest;
use wals_web::state::AppState;

const CATALOG: &str = r#"{
    "dataset": {
        "name": "WALS Online",
        "domain": "wals.info",
        "publisher_name": "MPI EVA",
        "publisher_place": "Leipzig",
        "publisher_url": "https://www.eva.mpg.de",
        "contact": "contact@wals.info",
        "editors": [{"name": "Matthew S. Dryer", "email": "dryer@example.org"}]
    },
    "families": [
        {"id": "aust", "name": "Austronesian"},
        {"id": "ie", "name": "Indo-European"},
        {"id": "st", "name": "Sino-Tibetan"}
    ],
    "genera": [
        {"id": "germ", "name": "Germanic", "family_id": "ie"},
        {"id": "rom", "name": "Romance", "family_id": "ie"},
        {"id": "chin", "name": "Chinese", "family_id": "st"},
        {"id": "oce", "name": "Oceanic", "family_id": "aust"}
    ],
    "languages": [
        {"id": "eng", "name": "English", "ascii_name": "english", "genus_id": "germ",
         "identifiers": [{"name": "eng", "type": "iso639-3"}, {"name": "stan1293", "type": "glottolog"}]},
        {"id": "ger", "name": "German", "ascii_name": "german", "genus_id": "germ",
         "identifiers": [{"name": "deu", "type": "iso639-3"}, {"name": "Deutsch", "type": "name"}]},
        {"id": "fre", "name": "French", "ascii_name": "french", "genus_id": "rom",
         "identifiers": [{"name": "fra", "type": "iso639-3"}, {"name": "Francais", "type": "name"}]},
        {"id": "spa", "name": "Spanish", "ascii_name": "spanish", "genus_id": "rom",
         "identifiers": [{"name": "spa", "type": "iso639-3"}, {"name": "Castellano", "type": "name"}]},
        {"id": "mnd", "name": "Mandarin", "ascii_name": "mandarin", "genus_id": "chin",
         "latitude": 34.0, "longitude": 110.0,
         "identifiers": [{"name": "cmn", "type": "iso639-3"}, {"name": "Guoyu", "type": "name"}]},
        {"id": "fij", "name": "Fijian", "ascii_name": "fijian", "genus_id": "oce",
         "identifiers": [{"name": "fij", "type": "iso639-3"}]}
    ],
    "features": [
        {"id": "1A", "name": "Consonant Inventories",
         "domain": [{"number": 1, "name": "Small"}, {"number": 2, "name": "Moderately small"}, {"number": 3, "name": "Average"}]},
        {"id": "13A", "name": "Tone",
         "domain": [{"number": 1, "name": "No tones"}, {"number": 2, "name": "Simple tone system"}, {"number": 3, "name": "Complex tone system"}]}
    ],
    "values": [
        {"feature_id": "1A", "language_id": "eng", "number": 3},
        {"feature_id": "13A", "language_id": "mnd", "number": 3}
    ],
    "sources": [
        {"pk": 1, "id": "Quirk-1985", "name": "Quirk et al. 1985", "author": "Quirk, Randolph",
         "year": "1985", "title": "A Comprehensive Grammar of the English Language", "updated": "2013-05-10"}
    ]
}"#;

const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>WALS blog</title>
    <item>
      <title>Tone in Mandarin</title>
      <link>http://blog.wals.info/tone/</link>
      <pubDate>Mon, 01 Apr 2013 10:00:00 +0000</pubDate>
      <description>Mandarin has four tones.</description>
    </item>
  </channel>
</rss>"#;

fn make_state(dir: &tempfile::TempDir, limit: usize, blog_host: &str) -> AppState {
    std::fs::write(dir.path().join("catalog.json"), CATALOG).unwrap();
    let mut config = Config {
        data_dir: dir.path().to_path_buf(),
        languoid_limit: limit,
        ..Config::default()
    };
    config.blog.host = blog_host.to_string();
    AppState::new(config).unwrap()
}

async fn body_string(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(resp: &Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

async fn suggestions(state: &AppState, q: &str) -> Value {
    let resp = api::languoids::languoids(State(state.clone()), Query(LanguoidQuery::text(q)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    serde_json::from_str(&body_string(resp).await).unwrap()
}

fn ids(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

/// Start a blog stand-in serving `RSS` at /feed/, a 500 at /broken/ and a
/// response that takes three seconds at /slow/.
async fn serve_blog() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/feed/", get(|| async { RSS }))
        .route(
            "/broken/",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/slow/",
            get(|| async {
                tokio::time::sleep(std::time::Duration::from_secs(3)).await;
                RSS
            }),
        );
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr.to_string()
}

#[tokio::test]
async fn test_autocomplete_cascades_through_all_sources() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir, 20, "blog.wals.info");

    let body = suggestions(&state, "an").await;
    assert_eq!(
        ids(&body),
        vec![
            // language names, by ascii name
            "w-fij", "w-ger", "w-mnd", "w-spa",
            // identifiers (stan1293, Francais); Castellano repeats Spanish
            "w-eng", "w-fre",
            // genera
            "g-germ", "g-oce", "g-rom",
            // families
            "f-aust", "f-ie", "f-st",
        ]
    );
    assert_eq!(body["more"], Value::Bool(false));
    assert_eq!(body["context"], serde_json::json!({}));
    assert_eq!(body["results"][6]["text"], "Germanic [genus]");
}

#[tokio::test]
async fn test_autocomplete_stops_when_quota_is_filled() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir, 7, "blog.wals.info");

    let body = suggestions(&state, "AN").await;
    assert_eq!(
        ids(&body),
        vec!["w-fij", "w-ger", "w-mnd", "w-spa", "w-eng", "w-fre", "g-germ"]
    );
}

#[tokio::test]
async fn test_autocomplete_empty_query() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir, 20, "blog.wals.info");

    let body = suggestions(&state, "").await;
    assert_eq!(
        body,
        serde_json::json!({"results": [], "context": {}, "more": false})
    );

    let body = suggestions(&state, "zzz").await;
    assert!(ids(&body).is_empty());
}

#[tokio::test]
async fn test_direct_lookup_redirects() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir, 20, "blog.wals.info");

    let query = LanguoidQuery {
        id: Some("w-eng".to_string()),
        q: Some("an".to_string()),
    };
    let resp = api::languoids::languoids(State(state.clone()), Query(query))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/languoid/lect/wals_code_eng");

    let resp = api::languoids::languoids(State(state.clone()), Query(LanguoidQuery::direct("g-rom")))
        .await
        .unwrap();
    assert_eq!(location(&resp), "/languoid/genus/rom");

    let resp = api::languoids::languoids(State(state), Query(LanguoidQuery::direct("f-st")))
        .await
        .unwrap();
    assert_eq!(location(&resp), "/languoid/family/st");
}

#[tokio::test]
async fn test_direct_lookup_failures_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir, 20, "blog.wals.info");

    for key in ["w-xyz", "q-1", "eng", "g-eng"] {
        let err = api::languoids::languoids(State(state.clone()), Query(LanguoidQuery::direct(key)))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND, "key {key}");
    }
}

#[tokio::test]
async fn test_feature_info() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir, 20, "blog.wals.info");

    let info = api::features::feature_info(State(state.clone()), Path("13A".to_string()))
        .await
        .unwrap();
    assert_eq!(info.0.name, "Tone");
    let numbers: Vec<usize> = info.0.values.iter().map(|v| v.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(info.0.values[2].name, "Complex tone system");

    let err = api::features::feature_info(State(state), Path("999Z".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_genealogy_tree() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir, 20, "blog.wals.info");

    let tree = api::features::genealogy(State(state)).await.0;
    let families: Vec<&str> = tree.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(families, vec!["aust", "ie", "st"]);

    let ie = &tree[1];
    let genera: Vec<&str> = ie.genera.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(genera, vec!["germ", "rom"]);
    let romance: Vec<&str> = ie.genera[1].languages.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(romance, vec!["fre", "spa"]);
}

#[tokio::test]
async fn test_datapoint_comment_redirects_to_blog() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir, 20, "blog.wals.info");

    let resp = api::blog::comment(
        State(state.clone()),
        Path(("13A".to_string(), "wals_code_mnd".to_string())),
    )
    .await
    .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        location(&resp),
        "http://blog.wals.info/datapoint-13a-wals-code-mnd/#comment"
    );

    let err = api::blog::comment(State(state), Path(("13A".to_string(), "eng".to_string())))
        .await
        .unwrap_err();
    assert_eq!(err.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_matrix_download() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir, 20, "blog.wals.info");

    // written once at startup
    assert!(dir.path().join("downloads").join("matrix.csv").exists());

    let resp = api::downloads::matrix_csv(State(state)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));

    let body = body_string(resp).await;
    let mut lines = body.lines();
    assert_eq!(
        lines.next().unwrap(),
        "wals_code,iso_code,glottocode,Name,latitude,longitude,genus,family,1A Consonant Inventories,13A Tone"
    );
    assert_eq!(body.lines().count(), 7);
    assert!(body.contains("mnd,cmn,,Mandarin,34,110,Chinese,Sino-Tibetan,,3 Complex tone system"));
}

#[tokio::test]
async fn test_oai_identify_and_records() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir, 20, "blog.wals.info");

    let req = OaiRequest {
        verb: Some("Identify".to_string()),
        ..OaiRequest::default()
    };
    let resp = api::olac::refdb_oai(State(state.clone()), Query(req)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let xml = body_string(resp).await;
    assert!(xml.contains("<repositoryName>WALS Online RefDB</repositoryName>"));
    assert!(xml.contains("name=\"Matthew S. Dryer\" email=\"dryer@example.org\""));

    let req = OaiRequest {
        verb: Some("ListRecords".to_string()),
        metadata_prefix: Some("olac".to_string()),
        ..OaiRequest::default()
    };
    let xml = body_string(api::olac::refdb_oai(State(state), Query(req)).await).await;
    assert!(xml.contains("<identifier>oai:refdb.wals.info:1</identifier>"));
}

#[tokio::test]
async fn test_oai_rejects_undefined_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir, 20, "blog.wals.info");

    for (uri, code) in [
        ("/refdb_oai?verb=Identify&foo=bar", "badArgument"),
        ("/refdb_oai?verb=ListRecords&resumptionToken=42", "badResumptionToken"),
        (
            "/refdb_oai?verb=ListRecords&metadataPrefix=olac&resumptionToken=42",
            "badArgument",
        ),
    ] {
        let uri: Uri = uri.parse().unwrap();
        let query = Query::<OaiRequest>::try_from_uri(&uri).unwrap();
        let xml = body_string(api::olac::refdb_oai(State(state.clone()), query).await).await;
        assert!(
            xml.contains(&format!("<error code=\"{code}\">")),
            "{uri}: {xml}"
        );
    }
}

#[tokio::test]
async fn test_blog_feed_proxy_converts_rss() {
    let host = serve_blog().await;
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir, 20, &host);

    let resp = api::blog::blog_feed(
        State(state.clone()),
        Query(BlogFeedQuery {
            path: Some("/feed/".to_string()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/atom+xml");
    let xml = body_string(resp).await;
    assert!(xml.contains("<title>WALS blog</title>"));
    assert!(xml.contains("<summary>Mandarin has four tones.</summary>"));
    assert!(xml.contains("<updated>2013-04-01T10:00:00</updated>"));

    // non-200 upstream yields an empty feed, not an error
    let resp = api::blog::blog_feed(
        State(state),
        Query(BlogFeedQuery {
            path: Some("/broken/".to_string()),
        }),
    )
    .await
    .unwrap();
    let xml = body_string(resp).await;
    assert!(!xml.contains("<entry>"));
}

#[tokio::test]
async fn test_blog_feed_timeout_yields_empty_feed() {
    let host = serve_blog().await;
    let dir = tempfile::tempdir().unwrap();
    let mut state = make_state(&dir, 20, &host);
    state.config.blog.timeout_ms = 300;

    let resp = api::blog::blog_feed(
        State(state),
        Query(BlogFeedQuery {
            path: Some("/slow/".to_string()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/atom+xml");
    let xml = body_string(resp).await;
    assert!(xml.contains("<feed"));
    assert!(!xml.contains("<entry>"));
}

#[tokio::test]
async fn test_blog_feed_rejects_bad_paths() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir, 20, "blog.wals.info");

    for path in [None, Some(""), Some("http://evil.example.com/feed"), Some("//evil.example.com/")] {
        let err = api::blog::blog_feed(
            State(state.clone()),
            Query(BlogFeedQuery {
                path: path.map(str::to_string),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_blog_feed_unreachable_host_is_not_found() {
    // grab a free port, then close it
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let host = listener.local_addr().unwrap().to_string();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir, 20, &host);

    let err = api::blog::blog_feed(
        State(state),
        Query(BlogFeedQuery {
            path: Some("/feed/".to_string()),
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.0, StatusCode::NOT_FOUND);
}
