use super::{
    dto::{Notification, NotificationFindEntity},
    Error, NotificationsRepository,
};
use crate::repository::entity::NotificationInsertEntity;
use axum::async_trait;
use bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use futures::TryStreamExt;
use mongodb::{
    error::ErrorKind,
    options::{IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use notifier_wire::NotificationKind;
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

const NOTIFICATIONS: &str = "notifications";
const INDEX_NAME_USER_ID_CREATED_AT: &str = "index_user_id_created_at";

pub struct NotificationsRepositoryImpl {
    database: Database,
}

impl NotificationsRepositoryImpl {
    pub async fn new(database: Database) -> Result<Self, mongodb::error::Error> {
        database.create_collection(NOTIFICATIONS).await?;

        let collection = database.collection(NOTIFICATIONS);
        let index_names = collection.list_index_names().await?;

        if !index_names.contains(&INDEX_NAME_USER_ID_CREATED_AT.to_string()) {
            Self::create_user_id_created_at_index(&collection).await?;
            tracing::debug!("created index {NOTIFICATIONS}.{INDEX_NAME_USER_ID_CREATED_AT}");
        }

        Ok(Self { database })
    }

    async fn create_user_id_created_at_index(
        collection: &Collection<Document>,
    ) -> Result<(), mongodb::error::Error> {
        let index = IndexModel::builder()
            .keys(doc! {
                "user_id": 1,
                "created_at": -1,
            })
            .options(
                IndexOptions::builder()
                    .name(INDEX_NAME_USER_ID_CREATED_AT.to_string())
                    .build(),
            )
            .build();

        collection.create_index(index).await?;

        Ok(())
    }

    fn user_notifications_filter(user_id: Uuid, only_unread: bool) -> Document {
        let user_id = bson::Uuid::from(user_id);
        let mut filter = doc! {
            "user_id": user_id,
        };
        if only_unread {
            filter.insert("read", false);
        }

        filter
    }
}

#[async_trait]
impl NotificationsRepository for NotificationsRepositoryImpl {
    async fn insert(
        &self,
        user_id: Uuid,
        message: String,
        kind: NotificationKind,
        created_at: OffsetDateTime,
    ) -> Result<Notification, Error> {
        let insert_entity = NotificationInsertEntity {
            user_id: bson::Uuid::from(user_id),
            message,
            kind,
            read: false,
            created_at: DateTime::from(created_at),
        };

        let insert_result = self
            .database
            .collection::<NotificationInsertEntity>(NOTIFICATIONS)
            .insert_one(&insert_entity)
            .await?;

        let Bson::ObjectId(id) = insert_result.inserted_id else {
            tracing::error!("invalid type of inserted '_id'");
            return Err(Error::Mongo(
                ErrorKind::Custom(Arc::new("invalid type of inserted '_id'")).into(),
            ));
        };

        Ok(Notification {
            id,
            user_id,
            message: insert_entity.message,
            kind: insert_entity.kind,
            read: insert_entity.read,
            created_at,
        })
    }

    async fn find_many(
        &self,
        user_id: Uuid,
        skip: u64,
        limit: i64,
        only_unread: bool,
    ) -> Result<Vec<Notification>, Error> {
        let filter = Self::user_notifications_filter(user_id, only_unread);

        let cursor = self
            .database
            .collection::<NotificationFindEntity>(NOTIFICATIONS)
            .find(filter)
            .sort(doc! {
                "created_at": -1,
                "_id": -1,
            })
            .skip(skip)
            .limit(limit)
            .await?;

        let notifications = cursor.map_ok(Notification::from).try_collect().await?;

        Ok(notifications)
    }

    async fn count(&self, user_id: Uuid, only_unread: bool) -> Result<u64, Error> {
        let filter = Self::user_notifications_filter(user_id, only_unread);

        let count = self
            .database
            .collection::<Document>(NOTIFICATIONS)
            .count_documents(filter)
            .await?;

        Ok(count)
    }

    async fn update_read(&self, id: ObjectId, user_id: Uuid) -> Result<Notification, Error> {
        let user_id = bson::Uuid::from(user_id);

        let updated_entity = self
            .database
            .collection::<NotificationFindEntity>(NOTIFICATIONS)
            .find_one_and_update(
                doc! {
                    "_id": id,
                    "user_id": user_id,
                },
                doc! {
                    "$set": {
                        "read": true,
                    }
                },
            )
            .return_document(ReturnDocument::After)
            .await?;

        match updated_entity {
            Some(entity) => Ok(Notification::from(entity)),
            None => Err(Error::NoDocumentUpdated),
        }
    }

    async fn update_all_read(&self, user_id: Uuid) -> Result<u64, Error> {
        let user_id = bson::Uuid::from(user_id);

        let update_result = self
            .database
            .collection::<Document>(NOTIFICATIONS)
            .update_many(
                doc! {
                    "user_id": user_id,
                    "read": false,
                },
                doc! {
                    "$set": {
                        "read": true,
                    }
                },
            )
            .await?;

        Ok(update_result.modified_count)
    }

    async fn delete(&self, id: ObjectId, user_id: Uuid) -> Result<bool, Error> {
        let user_id = bson::Uuid::from(user_id);

        let delete_result = self
            .database
            .collection::<Document>(NOTIFICATIONS)
            .delete_one(doc! {
                "_id": id,
                "user_id": user_id,
            })
            .await?;

        Ok(delete_result.deleted_count == 1)
    }
}
