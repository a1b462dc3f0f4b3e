//! MongoDB database connection and configuration

use mongodb::bson::doc;
use mongodb::{options::ClientOptions, options::IndexOptions, Client, Database, IndexModel};

/// MongoDB database wrapper
#[derive(Clone)]
pub struct MongoDb {
    #[allow(dead_code)]
    client: Client,
    db: Database,
}

impl MongoDb {
    /// Connect to MongoDB
    pub async fn connect(uri: &str, db_name: &str) -> anyhow::Result<Self> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;
        let db = client.database(db_name);

        // Test connection
        db.run_command(doc! { "ping": 1 }, None).await?;
        tracing::info!("Connected to MongoDB: {}", db_name);

        let instance = Self { client, db };
        instance.ensure_indexes().await?;

        Ok(instance)
    }

    /// Get database reference
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Get collection
    pub fn collection<T>(&self, name: &str) -> mongodb::Collection<T> {
        self.db.collection(name)
    }

    /// Ping the database to check connection
    pub async fn ping(&self) -> anyhow::Result<()> {
        self.db
            .run_command(mongodb::bson::doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    /// Ensure all required indexes exist
    pub async fn ensure_indexes(&self) -> anyhow::Result<()> {
        tracing::info!("Ensuring MongoDB indexes...");

        self.create_indexes(
            collections::PROJECTS,
            vec![IndexModel::builder().keys(doc! { "ownerId": 1 }).build()],
        )
        .await?;

        self.create_indexes(
            collections::THREADS,
            vec![
                IndexModel::builder().keys(doc! { "projectId": 1 }).build(),
                IndexModel::builder().keys(doc! { "ownerId": 1 }).build(),
            ],
        )
        .await?;

        self.create_indexes(
            collections::MESSAGES,
            vec![IndexModel::builder()
                .keys(doc! { "conversationId": 1, "timestamp": 1 })
                .build()],
        )
        .await?;

        self.create_indexes(
            collections::REPORTS,
            vec![
                IndexModel::builder().keys(doc! { "userId": 1 }).build(),
                IndexModel::builder().keys(doc! { "projectId": 1 }).build(),
            ],
        )
        .await?;

        self.create_indexes(
            collections::INSIGHTS,
            vec![IndexModel::builder().keys(doc! { "threadId": 1 }).build()],
        )
        .await?;

        self.create_indexes(
            collections::USERS,
            vec![IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build()],
        )
        .await?;

        self.create_indexes(
            collections::SESSIONS,
            vec![IndexModel::builder().keys(doc! { "userId": 1 }).build()],
        )
        .await?;

        tracing::info!("MongoDB indexes ensured successfully");
        Ok(())
    }

    /// Helper to create indexes for a collection
    async fn create_indexes(
        &self,
        collection: &str,
        indexes: Vec<IndexModel>,
    ) -> anyhow::Result<()> {
        let coll = self.db.collection::<mongodb::bson::Document>(collection);
        coll.create_indexes(indexes, None).await?;
        Ok(())
    }
}

/// Collection names
pub mod collections {
    pub const PROJECTS: &str = "projects";
    pub const THREADS: &str = "threads";
    pub const MESSAGES: &str = "messages";
    pub const REPORTS: &str = "reports";
    pub const INSIGHTS: &str = "insights";
    pub const SIGNUP: &str = "signup";
    pub const USERS: &str = "users";
    pub const SESSIONS: &str = "sessions";
}
