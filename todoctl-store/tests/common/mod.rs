//! Scenarios shared by the in-memory and PostgreSQL test suites

#![allow(dead_code)]

use todoctl_store::models::{CreateLabel, CreateTodo};
use todoctl_store::repos::{LabelRepo, TodoLabelRepo, TodoRepo};
use todoctl_store::{Store, StoreError, Transaction};

pub fn label(name: &str) -> CreateLabel {
    CreateLabel::new(name).expect("valid label name")
}

pub fn todo(text: &str) -> CreateTodo {
    CreateTodo::new(text).expect("valid todo text")
}

/// label "urgent" -> 1, todo -> 1, tag, re-tag fails, untag, delete label
pub async fn urgent_label_lifecycle<S: Store>(store: &S) -> anyhow::Result<()> {
    let labels = LabelRepo::new(store);
    let todos = TodoRepo::new(store);
    let tags = TodoLabelRepo::new(store);

    let urgent = labels.create(label("urgent")).await?;
    assert_eq!(urgent.id, 1);
    let buy_milk = todos.create(todo("buy milk")).await?;
    assert_eq!(buy_milk.id, 1);

    tags.attach(1, 1).await?;
    let err = tags.attach(1, 1).await.unwrap_err();
    assert!(err.is_unique_violation(), "expected pk violation, got {err}");
    assert_eq!(err.constraint(), Some("todo_labels_pkey"));

    assert!(tags.detach(1, 1).await?);
    labels.delete(1).await?;
    assert!(labels.all().await?.is_empty());
    Ok(())
}

pub async fn deleting_tagged_label_fails_at_commit<S: Store>(store: &S) -> anyhow::Result<()> {
    let labels = LabelRepo::new(store);
    let l = labels.create(label("home")).await?;
    let t = TodoRepo::new(store).create(todo("water plants")).await?;
    TodoLabelRepo::new(store).attach(t.id, l.id).await?;

    // The DELETE itself succeeds; commit rejects the dangling association
    let mut tx = store.begin().await?;
    assert!(tx.delete_label(l.id).await?);
    let err = tx.commit().await.unwrap_err();
    assert!(err.is_foreign_key_violation(), "expected fk violation, got {err}");
    assert_eq!(err.constraint(), Some("todo_labels_label_id_fkey"));

    // Same through the repository, and the label survives
    assert!(labels.delete(l.id).await.unwrap_err().is_foreign_key_violation());
    assert_eq!(labels.find(l.id).await?, l);
    Ok(())
}

pub async fn deleting_tagged_todo_fails_at_commit<S: Store>(store: &S) -> anyhow::Result<()> {
    let l = LabelRepo::new(store).create(label("work")).await?;
    let todos = TodoRepo::new(store);
    let t = todos.create(todo("file report")).await?;
    TodoLabelRepo::new(store).attach(t.id, l.id).await?;

    let err = todos.delete(t.id).await.unwrap_err();
    assert_eq!(err.constraint(), Some("todo_labels_todo_id_fkey"));
    assert_eq!(todos.find(t.id).await?, t);
    Ok(())
}

/// Association first, referents later, all in one transaction
pub async fn association_before_referents<S: Store>(store: &S) -> anyhow::Result<()> {
    let mut tx = store.begin().await?;
    let todo_id = tx.reserve_todo_id().await?;
    let label_id = tx.reserve_label_id().await?;

    tx.attach(todo_id, label_id).await?;
    tx.insert_label_with_id(label_id, &label("later")).await?;
    tx.insert_todo_with_id(todo_id, &todo("written after its tag")).await?;
    tx.commit().await?;

    let labels = TodoLabelRepo::new(store).labels_for_todo(todo_id).await?;
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].id, label_id);
    assert_eq!(labels[0].name, "later");

    // Reserved ids came from the sequences; the next serial ids follow them
    let next_label = LabelRepo::new(store).create(label("next")).await?;
    assert_eq!(next_label.id, label_id + 1);
    let next_todo = TodoRepo::new(store).create(todo("next")).await?;
    assert_eq!(next_todo.id, todo_id + 1);
    Ok(())
}

pub async fn check_deferred_passes_once_referents_exist<S: Store>(
    store: &S,
) -> anyhow::Result<()> {
    let mut tx = store.begin().await?;
    let todo_id = tx.reserve_todo_id().await?;
    let l = tx.insert_label(&label("soon")).await?;
    tx.attach(todo_id, l.id).await?;
    tx.insert_todo_with_id(todo_id, &todo("tagged early")).await?;

    tx.check_deferred().await?;
    // Still usable after the early check
    assert_eq!(tx.todo_ids_for_label(l.id).await?, vec![todo_id]);
    tx.commit().await?;
    Ok(())
}

pub async fn check_deferred_reports_missing_todo<S: Store>(store: &S) -> anyhow::Result<()> {
    let mut tx = store.begin().await?;
    let l = tx.insert_label(&label("work")).await?;
    tx.attach(42, l.id).await?;

    let err = tx.check_deferred().await.unwrap_err();
    assert!(err.is_foreign_key_violation(), "expected fk violation, got {err}");
    assert_eq!(err.constraint(), Some("todo_labels_todo_id_fkey"));
    assert!(matches!(
        tx.commit().await.unwrap_err(),
        StoreError::TransactionAborted
    ));

    assert!(LabelRepo::new(store).all().await?.is_empty());
    Ok(())
}

/// One todo and the labels "home", "errand", "urgent"
async fn seed_tags<S: Store>(store: &S) -> anyhow::Result<(i32, Vec<i32>)> {
    let t = TodoRepo::new(store).create(todo("buy milk")).await?;
    let labels = LabelRepo::new(store);
    let mut ids = Vec::new();
    for name in ["home", "errand", "urgent"] {
        ids.push(labels.create(label(name)).await?.id);
    }
    Ok((t.id, ids))
}

pub async fn set_labels_replaces_previous_set<S: Store>(store: &S) -> anyhow::Result<()> {
    let (todo_id, ids) = seed_tags(store).await?;
    let tags = TodoLabelRepo::new(store);

    tags.attach(todo_id, ids[0]).await?;
    let labels = tags.set_labels(todo_id, &[ids[2], ids[1], ids[2]]).await?;
    let names: Vec<_> = labels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["errand", "urgent"]);
    assert!(tags.todos_for_label(ids[0]).await?.is_empty());
    Ok(())
}

pub async fn set_labels_with_missing_label_keeps_old_set<S: Store>(
    store: &S,
) -> anyhow::Result<()> {
    let (todo_id, ids) = seed_tags(store).await?;
    let tags = TodoLabelRepo::new(store);

    tags.attach(todo_id, ids[0]).await?;
    let err = tags.set_labels(todo_id, &[ids[1], 999]).await.unwrap_err();
    assert!(err.is_foreign_key_violation(), "expected fk violation, got {err}");

    let labels = tags.labels_for_todo(todo_id).await?;
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].id, ids[0]);
    Ok(())
}

pub async fn failed_multi_tag_attaches_nothing<S: Store>(store: &S) -> anyhow::Result<()> {
    let (todo_id, ids) = seed_tags(store).await?;
    let tags = TodoLabelRepo::new(store);

    let err = tags.attach_many(todo_id, &[ids[0], 999]).await.unwrap_err();
    assert!(err.is_foreign_key_violation(), "expected fk violation, got {err}");
    let err = tags.attach_many(todo_id, &[ids[1], ids[1]]).await.unwrap_err();
    assert!(err.is_unique_violation(), "expected pk violation, got {err}");

    assert!(tags.labels_for_todo(todo_id).await?.is_empty());
    Ok(())
}

pub async fn association_without_referents_fails_at_commit<S: Store>(
    store: &S,
) -> anyhow::Result<()> {
    let mut tx = store.begin().await?;
    let t = tx.insert_todo(&todo("orphan tag")).await?;
    tx.attach(t.id, 4242).await?;
    let err = tx.commit().await.unwrap_err();
    assert!(err.is_foreign_key_violation(), "expected fk violation, got {err}");

    // Nothing from the failed transaction persisted
    assert!(TodoRepo::new(store).all().await?.is_empty());
    Ok(())
}

pub async fn detaching_absent_pair_is_a_noop<S: Store>(store: &S) -> anyhow::Result<()> {
    let tags = TodoLabelRepo::new(store);
    assert!(!tags.detach(1, 1).await?);
    assert!(!tags.detach(1, 1).await?);
    Ok(())
}

pub async fn retag_in_separate_transactions_fails<S: Store>(store: &S) -> anyhow::Result<()> {
    let l = LabelRepo::new(store).create(label("later")).await?;
    let t = TodoRepo::new(store).create(todo("read book")).await?;

    let mut first = store.begin().await?;
    first.attach(t.id, l.id).await?;
    first.commit().await?;

    let mut second = store.begin().await?;
    let err = second.attach(t.id, l.id).await.unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation { .. }));
    assert!(matches!(
        second.commit().await.unwrap_err(),
        StoreError::TransactionAborted
    ));

    assert_eq!(TodoLabelRepo::new(store).todos_for_label(l.id).await?, vec![t.id]);
    Ok(())
}
