use std::sync::Arc;

use async_trait::async_trait;
use class_slots::board::{Board, Prompter};
use class_slots::client::ClassesClient;
use class_slots::ids::SequentialIds;
use class_slots::schedule::Schedule;
use class_slots::settings::{Settings, StoreBackend, StoreSettings};
use class_slots::store::MemoryStore;
use class_slots::{AppState, build_router};
use url::Url;

struct Yes(&'static str);

#[async_trait]
impl Prompter for Yes {
    async fn confirm(&mut self, _message: &str) -> bool {
        true
    }

    async fn prompt(&mut self, _message: &str) -> Option<String> {
        Some(self.0.to_string())
    }
}

/// Serves the real router on an ephemeral port and returns its `/api` URL.
async fn spawn_server() -> Url {
    let settings = Settings {
        debug: true,
        enable_swagger: false,
        port: 0,
        cors_origin: "http://localhost:5173".to_string(),
        store: StoreSettings {
            backend: StoreBackend::Memory,
            database_url: String::new(),
        },
    };
    let state = AppState {
        settings,
        schedule: Schedule::new(
            Arc::new(MemoryStore::new()),
            Arc::new(SequentialIds::new(1_000, 1_000)),
        ),
    };
    let app = build_router(state).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/api")).unwrap()
}

#[tokio::test]
async fn test_board_full_session() {
    // Arrange
    let api = spawn_server().await;
    let mut board = Board::new(ClassesClient::new(api));
    board.refresh().await;
    assert!(board.classes().is_empty());

    // Act - create
    board.open_form();
    board.set_name("Math IA");
    board.set_date("2025-04-01");
    board.set_slot(0, "12:00-12:10");
    board.set_slot(1, "12:10-12:20");
    board.submit_create().await.unwrap();

    // Assert
    assert_eq!(board.classes().len(), 1);
    let class = board.classes()[0].clone();
    assert_eq!(class.name, "Math IA");
    assert_eq!(class.date, "2025-04-01");
    assert_eq!(class.time_slots.len(), 2);

    // Act - assign
    let slot_id = class.time_slots[1].id;
    board.assign(class.id, slot_id, &mut Yes(" Mio ")).await;

    // Assert
    let assigned = &board.classes()[0];
    assert_eq!(assigned.time_slots[0].assigned_to, "");
    assert_eq!(assigned.time_slots[1].assigned_to, "Mio");
    assert!(board.render().contains("12:10-12:20: Mio"));

    // Act - duplicate
    board.duplicate(class.id, &mut Yes("")).await;

    // Assert - copy listed first, assignments and date cleared
    assert_eq!(board.classes().len(), 2);
    let copy = &board.classes()[0];
    assert_ne!(copy.id, class.id);
    assert_eq!(copy.name, "Math IA");
    assert_eq!(copy.date, "");
    assert!(copy.time_slots.iter().all(|slot| slot.assigned_to.is_empty()));

    // Act - delete the original
    board.delete(class.id, &mut Yes("")).await;

    // Assert
    assert_eq!(board.classes().len(), 1);
    assert_ne!(board.classes()[0].id, class.id);
}
