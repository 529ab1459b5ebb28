//! Persistent list tools.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{required_str, Tool};
use crate::store::Store;

pub const EMPTY_LIST: &str = "The list is empty";

/// Append an item to the persistent list.
pub struct AddListItem {
    store: Arc<Store>,
}

impl AddListItem {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for AddListItem {
    fn name(&self) -> &str {
        "add_list_item"
    }

    fn description(&self) -> &str {
        "Add an item to the persistent list"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "item": {
                    "type": "string",
                    "description": "The item to add"
                }
            },
            "required": ["item"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let item = required_str(&args, "item")?;
        let items = self.store.add_list_item(item)?;
        Ok(format!(
            "Added {} to the list. Current list: {}",
            item,
            items.join(", ")
        ))
    }
}

/// Read the persistent list.
pub struct GetListItems {
    store: Arc<Store>,
}

impl GetListItems {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetListItems {
    fn name(&self) -> &str {
        "get_list_items"
    }

    fn description(&self) -> &str {
        "Get all items from the list"
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _args: Value) -> anyhow::Result<String> {
        let items = self.store.list_item_names()?;
        if items.is_empty() {
            return Ok(EMPTY_LIST.to_string());
        }
        Ok(format!("Current list items: {}", items.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Arc<Store> {
        Arc::new(Store::open_in_memory().expect("open store"))
    }

    #[tokio::test]
    async fn empty_list_has_explicit_message() {
        let out = GetListItems::new(store())
            .execute(json!({}))
            .await
            .expect("get items");
        assert_eq!(out, EMPTY_LIST);
    }

    #[tokio::test]
    async fn added_items_are_listed_in_insertion_order() {
        let store = store();
        let add = AddListItem::new(store.clone());
        add.execute(json!({"item": "bread"})).await.expect("add bread");
        let confirmation = add.execute(json!({"item": "milk"})).await.expect("add milk");
        assert_eq!(
            confirmation,
            "Added milk to the list. Current list: bread, milk"
        );

        let listed = GetListItems::new(store)
            .execute(json!({}))
            .await
            .expect("get items");
        assert_eq!(listed, "Current list items: bread, milk");
    }

    #[tokio::test]
    async fn add_without_item_fails_and_writes_nothing() {
        let store = store();
        let result = AddListItem::new(store.clone()).execute(json!({"thing": 1})).await;
        assert!(result.is_err());
        assert!(store.list_item_names().expect("names").is_empty());
    }
}
