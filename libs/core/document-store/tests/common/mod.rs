//! Listing properties every `DocumentStore` backend must satisfy

use document_store::bson::{Bson, Document, doc, oid::ObjectId};
use document_store::{
    DocumentStore, Filter, FindQuery, FindResult, JoinSpec, PaginationParams, SortKey, StoreError,
    find, find_first,
};

const PRODUCT_KEYS: &[SortKey] = &[
    SortKey::Id,
    SortKey::Name,
    SortKey::Price,
    SortKey::CategoryName,
];

fn params() -> PaginationParams {
    PaginationParams::default()
}

fn category_join() -> JoinSpec {
    JoinSpec::new("categories", "categoryId", "_id", "category")
}

async fn list<S: DocumentStore>(
    store: &S,
    collection: &str,
    params: &PaginationParams,
) -> FindResult<Document> {
    let query = FindQuery::from_params(params, PRODUCT_KEYS);
    find(store, collection, &query).await.expect("find failed")
}

fn names(result: &FindResult<Document>) -> Vec<String> {
    result
        .items
        .iter()
        .map(|item| item.get_str("name").unwrap_or_default().to_string())
        .collect()
}

pub async fn deleted_flag_visibility<S: DocumentStore>(store: &S) {
    let keep = store.insert("flags", doc! { "name": "Margherita" }).await.unwrap();
    let gone = store.insert("flags", doc! { "name": "Capricciosa" }).await.unwrap();
    store.soft_delete_by_id("flags", gone).await.unwrap();

    let default = list(store, "flags", &params()).await;
    assert_eq!(default.count, 1);
    assert_eq!(names(&default), vec!["Margherita"]);
    assert!(default.items.iter().all(|item| !item.contains_key("deleted")));

    let with_deleted = list(
        store,
        "flags",
        &PaginationParams {
            deleted: true,
            ..params()
        },
    )
    .await;
    assert_eq!(with_deleted.count, 2);
    for item in &with_deleted.items {
        let id = item.get_object_id("_id").unwrap();
        assert_eq!(item.get_bool("deleted").unwrap(), id == gone);
    }

    let raw = store.get_by_id("flags", gone).await.unwrap().unwrap();
    assert!(raw.get_bool("deleted").unwrap());
    assert!(store.get_by_id("flags", keep).await.unwrap().is_some());
}

pub async fn soft_delete_is_idempotent<S: DocumentStore>(store: &S) {
    let id = store.insert("twice", doc! { "name": "Bianca" }).await.unwrap();
    store.soft_delete_by_id("twice", id).await.unwrap();
    store.soft_delete_by_id("twice", id).await.unwrap();
    store.soft_delete_by_id("twice", ObjectId::new()).await.unwrap();

    let raw = store.get_by_id("twice", id).await.unwrap().unwrap();
    assert!(raw.get_bool("deleted").unwrap());
    assert_eq!(list(store, "twice", &params()).await.count, 0);
}

pub async fn pagination_windows<S: DocumentStore>(store: &S) {
    for i in 0..25 {
        store
            .insert("pages", doc! { "name": format!("item-{i:02}") })
            .await
            .unwrap();
    }

    let mut seen = Vec::new();
    for (page, expected) in [(1, 10), (2, 10), (3, 5), (4, 0)] {
        let result = list(
            store,
            "pages",
            &PaginationParams {
                order_by: "name".into(),
                ascending: true,
                page,
                per_page: 10,
                ..params()
            },
        )
        .await;

        assert_eq!(result.items.len(), expected, "page {page}");
        assert_eq!(result.count, 25);
        assert_eq!(result.page, Some(page));
        assert_eq!(result.total_pages, Some(3));
        seen.extend(names(&result));
    }

    let expected: Vec<String> = (0..25).map(|i| format!("item-{i:02}")).collect();
    assert_eq!(seen, expected);

    let everything = list(
        store,
        "pages",
        &PaginationParams {
            paginated: false,
            ..params()
        },
    )
    .await;
    assert_eq!(everything.items.len(), 25);
    assert_eq!(everything.page, None);
    assert_eq!(everything.total_pages, None);
}

pub async fn ordering_by_name_and_price<S: DocumentStore>(store: &S) {
    for (name, price) in [("Diavola", 9.5), ("Bufala", 11.0), ("Capricciosa", 8.0)] {
        store
            .insert("ordered", doc! { "name": name, "price": price })
            .await
            .unwrap();
    }

    let by_name = list(
        store,
        "ordered",
        &PaginationParams {
            order_by: "name".into(),
            ascending: true,
            ..params()
        },
    )
    .await;
    assert_eq!(names(&by_name), vec!["Bufala", "Capricciosa", "Diavola"]);

    let by_price_desc = list(
        store,
        "ordered",
        &PaginationParams {
            order_by: "price".into(),
            ascending: false,
            ..params()
        },
    )
    .await;
    assert_eq!(names(&by_price_desc), vec!["Bufala", "Diavola", "Capricciosa"]);

    let newest_first = list(store, "ordered", &params()).await;
    assert_eq!(names(&newest_first), vec!["Capricciosa", "Bufala", "Diavola"]);
}

pub async fn case_insensitive_search<S: DocumentStore>(store: &S) {
    for name in ["Pizza Margherita", "pizza bianca", "Tiramisu", "Pizz(a) speciale"] {
        store.insert("search", doc! { "name": name }).await.unwrap();
    }

    let found = list(
        store,
        "search",
        &PaginationParams {
            search: "PIZZA".into(),
            order_by: "name".into(),
            ascending: true,
            ..params()
        },
    )
    .await;
    assert_eq!(found.count, 2);
    assert_eq!(names(&found), vec!["Pizza Margherita", "pizza bianca"]);

    let literal = list(
        store,
        "search",
        &PaginationParams {
            search: "z(a)".into(),
            ..params()
        },
    )
    .await;
    assert_eq!(names(&literal), vec!["Pizz(a) speciale"]);
}

pub async fn product_category_join<S: DocumentStore>(store: &S) {
    let pizze = store
        .insert("categories", doc! { "name": "Pizze", "slug": "pizze" })
        .await
        .unwrap();
    let bevande = store
        .insert("categories", doc! { "name": "Bevande", "slug": "bevande" })
        .await
        .unwrap();
    store.soft_delete_by_id("categories", bevande).await.unwrap();

    store
        .insert("products", doc! { "name": "Diavola", "price": 9.0, "categoryId": pizze })
        .await
        .unwrap();
    store
        .insert("products", doc! { "name": "Chinotto", "price": 3.0, "categoryId": bevande })
        .await
        .unwrap();
    store
        .insert("products", doc! { "name": "Orfano", "price": 1.0, "categoryId": ObjectId::new() })
        .await
        .unwrap();

    let query = FindQuery::from_params(
        &PaginationParams {
            order_by: "category".into(),
            ascending: true,
            ..params()
        },
        PRODUCT_KEYS,
    )
    .join(category_join());
    let result: FindResult<Document> = find(store, "products", &query).await.unwrap();

    assert_eq!(result.count, 3);
    assert_eq!(names(&result), vec!["Orfano", "Chinotto", "Diavola"]);

    let orphan = &result.items[0];
    assert!(!orphan.contains_key("category"));

    let chinotto = result.items[1].get_document("category").unwrap();
    assert_eq!(chinotto.get_str("name").unwrap(), "Bevande");
    assert!(!chinotto.contains_key("deleted"));

    let diavola = result.items[2].get_document("category").unwrap();
    assert_eq!(diavola.get_object_id("_id").unwrap(), pizze);

    let filtered = FindQuery::from_params(&params(), PRODUCT_KEYS)
        .join(category_join())
        .with_field("categoryId", pizze);
    let result: FindResult<Document> = find(store, "products", &filtered).await.unwrap();
    assert_eq!(names(&result), vec!["Diavola"]);

    let with_deleted = FindQuery::from_params(
        &PaginationParams {
            deleted: true,
            ..params()
        },
        PRODUCT_KEYS,
    )
    .join(category_join())
    .with_field("categoryId", bevande);
    let result: FindResult<Document> = find(store, "products", &with_deleted).await.unwrap();
    let category = result.items[0].get_document("category").unwrap();
    assert_eq!(category.get("deleted"), Some(&Bson::Boolean(true)));
}

pub async fn partial_update<S: DocumentStore>(store: &S) {
    let id = store
        .insert("updates", doc! { "name": "DHL", "costs": 5.0 })
        .await
        .unwrap();

    store
        .update_by_id("updates", id, doc! { "name": Bson::Null, "costs": 7.5 })
        .await
        .unwrap();
    store.update_by_id("updates", id, Document::new()).await.unwrap();

    let stored = store.get_by_id("updates", id).await.unwrap().unwrap();
    assert_eq!(stored.get_str("name").unwrap(), "DHL");
    assert_eq!(stored.get_f64("costs").unwrap(), 7.5);
    assert!(!stored.get_bool("deleted").unwrap());

    let by_slug = store
        .find_one_by_field("updates", "name", "DHL".into())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_slug.get_object_id("_id").unwrap(), id);
}

pub async fn lookup_by_id_hides_deleted<S: DocumentStore>(store: &S) {
    let id = store.insert("lookup", doc! { "name": "GLS" }).await.unwrap();
    store.insert("lookup", doc! { "name": "SDA" }).await.unwrap();

    let found: Document = find_first(store, "lookup", &FindQuery::by_id(id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.get_str("name").unwrap(), "GLS");
    assert!(!found.contains_key("deleted"));

    store.soft_delete_by_id("lookup", id).await.unwrap();
    let gone: Option<Document> = find_first(store, "lookup", &FindQuery::by_id(id))
        .await
        .unwrap();
    assert!(gone.is_none());
}

pub async fn unique_field_rejects_repeats<S: DocumentStore>(store: &S) {
    store.ensure_unique("accounts", "email").await.unwrap();
    // idempotent
    store.ensure_unique("accounts", "email").await.unwrap();

    let first = store
        .insert("accounts", doc! { "email": "chef@menu.it" })
        .await
        .unwrap();
    let second = store
        .insert("accounts", doc! { "email": "waiter@menu.it" })
        .await
        .unwrap();

    let repeated = store
        .insert("accounts", doc! { "email": "chef@menu.it" })
        .await;
    assert!(matches!(repeated, Err(StoreError::Duplicate { .. })));

    let renamed = store
        .update_by_id("accounts", second, doc! { "email": "chef@menu.it" })
        .await;
    assert!(matches!(renamed, Err(StoreError::Duplicate { .. })));

    // rewriting a record's own value is not a repeat
    store
        .update_by_id("accounts", first, doc! { "email": "chef@menu.it" })
        .await
        .unwrap();

    let count = store.count("accounts", &Filter::active()).await.unwrap();
    assert_eq!(count, 2);
}
