//! CRUD operations over the in-memory activity document.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::dates::DateRange;
use crate::models::{AppData, NewUser, NewWalk, User, UserPatch, Walk, WalkPatch};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user {0} not found")]
    UserNotFound(Uuid),
    #[error("walk {0} not found")]
    WalkNotFound(Uuid),
    #[error("failed to access data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode data file: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AppData {
    pub fn find_user(&self, id: Uuid) -> Result<&User, StoreError> {
        self.users.get(&id).ok_or(StoreError::UserNotFound(id))
    }

    /// Users ordered by creation time.
    pub fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.values().cloned().collect();
        users.sort_by_key(|user| user.created_at);
        users
    }

    pub fn create_user(&mut self, new: NewUser, now: DateTime<Utc>) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            goal_type: new.goal_type,
            goal_value: new.goal_value,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.id, user.clone());
        user
    }

    pub fn update_user(
        &mut self,
        id: Uuid,
        patch: UserPatch,
        now: DateTime<Utc>,
    ) -> Result<User, StoreError> {
        let user = self.users.get_mut(&id).ok_or(StoreError::UserNotFound(id))?;
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(goal_type) = patch.goal_type {
            user.goal_type = goal_type;
        }
        if let Some(goal_value) = patch.goal_value {
            user.goal_value = goal_value;
        }
        user.updated_at = now;
        Ok(user.clone())
    }

    /// Removes the user only; their walks stay in the document.
    pub fn delete_user(&mut self, id: Uuid) -> Result<User, StoreError> {
        self.users.remove(&id).ok_or(StoreError::UserNotFound(id))
    }

    pub fn find_walk(&self, id: Uuid) -> Result<&Walk, StoreError> {
        self.walks.get(&id).ok_or(StoreError::WalkNotFound(id))
    }

    /// A user's walks, newest first, optionally restricted to `range`.
    pub fn find_walks_by_user(&self, user_id: Uuid, range: Option<&DateRange>) -> Vec<Walk> {
        let mut walks: Vec<Walk> = self
            .walks
            .values()
            .filter(|walk| walk.user_id == user_id)
            .filter(|walk| range.is_none_or(|range| range.contains(walk.date)))
            .cloned()
            .collect();
        walks.sort_by(|a, b| b.date.cmp(&a.date));
        walks
    }

    pub fn create_walk(&mut self, new: NewWalk, now: DateTime<Utc>) -> Result<Walk, StoreError> {
        self.find_user(new.user_id)?;
        let walk = Walk {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            steps: new.steps,
            distance: new.distance,
            duration: new.duration,
            date: new.date,
            created_at: now,
            updated_at: now,
        };
        self.walks.insert(walk.id, walk.clone());
        Ok(walk)
    }

    pub fn update_walk(
        &mut self,
        id: Uuid,
        patch: WalkPatch,
        now: DateTime<Utc>,
    ) -> Result<Walk, StoreError> {
        let walk = self.walks.get_mut(&id).ok_or(StoreError::WalkNotFound(id))?;
        if let Some(steps) = patch.steps {
            walk.steps = steps;
        }
        if let Some(distance) = patch.distance {
            walk.distance = distance;
        }
        if let Some(duration) = patch.duration {
            walk.duration = duration;
        }
        if let Some(date) = patch.date {
            walk.date = date;
        }
        walk.updated_at = now;
        Ok(walk.clone())
    }

    pub fn delete_walk(&mut self, id: Uuid) -> Result<Walk, StoreError> {
        self.walks.remove(&id).ok_or(StoreError::WalkNotFound(id))
    }
}
