#[cfg(test)]
pub mod test_utils {
    use crate::db::{create_resource, upsert_challenge, upsert_resource_role};
    use crate::error::SeedError;
    use crate::models::{ChallengeStatus, NewChallenge, NewResource, NewResourceRole};
    use crate::schema::apply_schema;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use sqlx::{Pool, Sqlite};
    use std::path::{Path, PathBuf};
    use std::str::FromStr;
    use std::sync::Once;
    use uuid::Uuid;

    static INIT: Once = Once::new();
    static TEST_AUTHOR: &str = "tester";

    pub fn init_test_logging() {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
                .with_test_writer()
                .try_init();
        });
    }

    /// Single-connection in-memory pool; every connection to `:memory:`
    /// would otherwise see its own empty database.
    pub async fn setup_test_db() -> Pool<Sqlite> {
        init_test_logging();

        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("Failed to parse in-memory database url")
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .expect("Failed to create in-memory database");

        apply_schema(&pool).await.expect("Failed to apply schema");

        pool
    }

    pub fn new_challenge(id: Uuid, name: &str) -> NewChallenge {
        NewChallenge {
            id,
            name: name.to_string(),
            description: format!("Description of {}", name),
            status: ChallengeStatus::New,
            created_by: TEST_AUTHOR.to_string(),
            updated_by: TEST_AUTHOR.to_string(),
        }
    }

    pub fn new_resource(challenge_id: Uuid, role_id: Uuid, member_id: &str) -> NewResource {
        NewResource {
            challenge_id,
            role_id,
            member_id: member_id.to_string(),
            member_handle: format!("{}_handle", member_id),
            created_by: TEST_AUTHOR.to_string(),
            updated_by: TEST_AUTHOR.to_string(),
        }
    }

    #[derive(Default)]
    pub struct TestDbBuilder {
        challenges: Vec<NewChallenge>,
        resource_roles: Vec<NewResourceRole>,
        resources: Vec<NewResource>,
    }

    impl TestDbBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn challenge(mut self, id: Uuid, name: &str) -> Self {
            self.challenges.push(new_challenge(id, name));
            self
        }

        pub fn resource_role(mut self, id: Uuid, name: &str) -> Self {
            self.resource_roles
                .push(NewResourceRole::new(id, name, TEST_AUTHOR));
            self
        }

        pub fn resource(mut self, challenge_id: Uuid, role_id: Uuid, member_id: &str) -> Self {
            self.resources
                .push(new_resource(challenge_id, role_id, member_id));
            self
        }

        pub async fn build(self) -> Result<TestDb, SeedError> {
            let pool = setup_test_db().await;

            for challenge in &self.challenges {
                upsert_challenge(&pool, challenge).await?;
            }

            for role in &self.resource_roles {
                upsert_resource_role(&pool, role).await?;
            }

            for resource in &self.resources {
                create_resource(&pool, resource).await?;
            }

            Ok(TestDb { pool })
        }
    }

    pub struct TestDb {
        pub pool: Pool<Sqlite>,
    }

    /// A database file under the system temp dir, removed on drop.
    pub struct TempDatabase {
        pub path: PathBuf,
    }

    impl TempDatabase {
        pub fn new() -> Self {
            init_test_logging();
            let path = std::env::temp_dir().join(format!("challenge-seeder-{}.db", Uuid::new_v4()));
            Self { path }
        }

        pub fn url(&self) -> String {
            format!("sqlite://{}", self.path.display())
        }
    }

    impl Drop for TempDatabase {
        fn drop(&mut self) {
            for suffix in ["", "-wal", "-shm", "-journal"] {
                let file = format!("{}{}", self.path.display(), suffix);
                if Path::new(&file).exists() {
                    let _ = std::fs::remove_file(file);
                }
            }
        }
    }
}
