//! MongoDB translation of [`FindQuery`](crate::query::FindQuery)

use mongodb::bson::{Document, doc};

use crate::query::{FindQuery, Filter};

/// `$match` document for a filter.
///
/// Search input is escaped so it matches literally.
pub fn filter_document(filter: &Filter) -> Document {
    let mut document = Document::new();

    if !filter.include_deleted {
        document.insert("deleted", false);
    }

    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        document.insert(
            filter.search_field.clone(),
            doc! { "$regex": regex::escape(search), "$options": "i" },
        );
    }

    for (field, value) in &filter.equals {
        document.insert(field.clone(), value.clone());
    }

    document
}

/// Aggregation stages: match, optional left join, sort, page, projection.
///
/// Sorting runs after the join so `category.name` is available. Ties are
/// broken on `_id` in the same direction to keep pages stable.
pub fn find_pipeline(query: &FindQuery) -> Vec<Document> {
    let mut stages = vec![doc! { "$match": filter_document(&query.filter) }];

    if let Some(join) = &query.join {
        stages.push(doc! {
            "$lookup": {
                "from": join.from.as_str(),
                "localField": join.local_field.as_str(),
                "foreignField": join.foreign_field.as_str(),
                "as": join.as_field.as_str(),
            }
        });
        stages.push(doc! {
            "$unwind": {
                "path": format!("${}", join.as_field),
                "preserveNullAndEmptyArrays": true,
            }
        });
    }

    if let Some(sort) = query.sort {
        let mut order = Document::new();
        order.insert(sort.key.field(), sort.direction());
        if sort.key.field() != "_id" {
            order.insert("_id", sort.direction());
        }
        stages.push(doc! { "$sort": order });
    }

    if let Some(window) = query.window {
        // MongoDB takes signed 64-bit values here
        stages.push(doc! { "$skip": i64::try_from(window.skip()).unwrap_or(i64::MAX) });
        stages.push(doc! { "$limit": i64::try_from(window.per_page).unwrap_or(i64::MAX) });
    }

    if query.scrub_deleted {
        let mut hidden = doc! { "deleted": 0 };
        if let Some(join) = &query.join {
            hidden.insert(format!("{}.deleted", join.as_field), 0);
        }
        stages.push(doc! { "$project": hidden });
    }

    stages
}
