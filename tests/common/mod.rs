#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key";

/// A CurseForge mod with one retail release
pub fn curse_mod(id: i64) -> Value {
    let file_id = id * 10;
    json!({
        "id": id,
        "gameId": 1,
        "name": format!("Mod {id}"),
        "links": {"websiteUrl": format!("https://www.curseforge.com/wow/addons/mod-{id}")},
        "summary": "A test mod",
        "downloadCount": 1000.0,
        "categories": [{"id": 1, "name": "Miscellaneous"}],
        "latestFiles": [{"id": file_id, "fileDate": "2021-06-29T14:22:41.19Z"}],
        "latestFilesIndexes": [
            {"gameVersion": "9.1.0", "fileId": file_id, "filename": "mod.zip", "releaseType": 1, "gameVersionTypeId": 517}
        ]
    })
}

/// One search page holding mods `first..first + count`
pub fn curse_page(first: i64, count: i64) -> Value {
    let data: Vec<Value> = (first..first + count).map(curse_mod).collect();
    json!({
        "data": data,
        "pagination": {"index": first, "pageSize": 50, "resultCount": count, "totalCount": 0}
    })
}

/// Mount one search page at the given index
pub async fn mount_curse_page(server: &MockServer, index: i64, count: i64) {
    Mock::given(method("GET"))
        .and(path("/v1/mods/search"))
        .and(query_param("index", index.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(curse_page(index, count)))
        .expect(1)
        .mount(server)
        .await;
}

/// A Tukui addon record with string-typed numeric fields
pub fn tukui_addon(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "author": "Tukz",
        "url": "https://www.tukui.org/downloads/addon.zip",
        "version": "1.0",
        "patch": "9.1.0",
        "lastupdate": "2021-07-01",
        "web_url": format!("https://www.tukui.org/addons.php?id={id}"),
        "small_desc": "A test addon",
        "downloads": "1000",
        "category": "Miscellaneous"
    })
}

/// Mount every Tukui endpoint; list endpoints return `per_list` records each
pub async fn mount_tukui(server: &MockServer, per_list: usize) {
    for key in ["addons", "classic-addons", "classic-tbc-addons"] {
        let records: Vec<Value> = (0..per_list)
            .map(|i| tukui_addon(&i.to_string(), &format!("{key} {i}")))
            .collect();
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .and(query_param(key, "all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(records))
            .expect(1)
            .mount(server)
            .await;
    }

    for (ui, id) in [("elvui", "-2"), ("tukui", "-1")] {
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .and(query_param("ui", ui))
            .respond_with(ResponseTemplate::new(200).set_body_json(tukui_addon(id, ui)))
            .expect(1)
            .mount(server)
            .await;
    }
}
