/**
 * User Service
 *
 * Registration, lookup, partial update and the follow graph. Repository
 * errors are classified here: unique violations on the users table become
 * `DuplicateEmail` / `DuplicateUsername`, a duplicate following row becomes
 * `AlreadyFollowing`, and anything unrecognized is logged and returned as
 * `Internal`.
 */

use std::collections::HashMap;

use crate::backend::auth::passwords::hash_password;
use crate::backend::db::models::{NewUser, UserRecord};
use crate::backend::db::{Constraint, RepoError, Repositories};
use crate::backend::error::BackendError;
use crate::shared::{Patch, Profile};

/// Lookup by email OR username; at least one should be set
#[derive(Debug, Clone, Default)]
pub struct UserLookup {
    pub email: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewUserInput {
    pub email: String,
    pub username: String,
    /// Plaintext; hashed before it reaches the repository
    pub password: String,
}

/// Partial update; `None` / `Patch::Unset` leave the stored value alone
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub bio: Patch<String>,
    pub image: Patch<String>,
}

#[derive(Clone)]
pub struct UserService {
    repos: Repositories,
    hash_cost: u32,
}

impl UserService {
    pub fn new(repos: Repositories, hash_cost: u32) -> Self {
        Self { repos, hash_cost }
    }

    pub async fn get_one(&self, lookup: &UserLookup) -> Result<UserRecord, BackendError> {
        self.repos
            .users
            .find_one(lookup.email.as_deref(), lookup.username.as_deref())
            .await
            .map_err(|e| BackendError::from_repo("user", e))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<UserRecord, BackendError> {
        self.repos
            .users
            .find_by_username(username)
            .await
            .map_err(|e| BackendError::from_repo("user", e))
    }

    /// Hash the password and create the user
    pub async fn insert(&self, input: NewUserInput) -> Result<UserRecord, BackendError> {
        let password_hash = hash_password(input.password, self.hash_cost).await?;
        let user = self
            .repos
            .users
            .insert(NewUser {
                email: input.email,
                username: input.username,
                password_hash,
            })
            .await
            .map_err(duplicate_user_error)?;

        tracing::info!("User registered: {}", user.username);
        Ok(user)
    }

    /// Apply the fields present in `update` to `username`'s row
    pub async fn update(
        &self,
        username: &str,
        update: UserUpdate,
    ) -> Result<UserRecord, BackendError> {
        let mut user = self.get_by_username(username).await?;

        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(new_username) = update.username {
            user.username = new_username;
        }
        if let Some(password) = update.password {
            user.password_hash = hash_password(password, self.hash_cost).await?;
        }
        user.bio = update.bio.apply(user.bio);
        user.image = update.image.apply(user.image);

        let updated = self
            .repos
            .users
            .update(&user)
            .await
            .map_err(duplicate_user_error)?;

        tracing::info!("User updated: {} (was {})", updated.username, username);
        Ok(updated)
    }

    /// Make `follower` follow `target`, returning the target's profile
    pub async fn follow_user(&self, follower: &str, target: &str) -> Result<Profile, BackendError> {
        if follower == target {
            return Err(BackendError::SelfFollow);
        }
        let user = self.get_profile_user(target).await?;

        self.repos
            .followings
            .insert(follower, &user.username)
            .await
            .map_err(|e| match e {
                RepoError::UniqueViolation(Constraint::Following) => {
                    BackendError::AlreadyFollowing {
                        username: user.username.clone(),
                    }
                }
                other => BackendError::internal("failed to insert following", other),
            })?;

        tracing::info!("{} followed {}", follower, user.username);
        Ok(profile_of(&user, true))
    }

    /// Remove the following row if there is one
    pub async fn unfollow_user(
        &self,
        follower: &str,
        target: &str,
    ) -> Result<Profile, BackendError> {
        if follower == target {
            return Err(BackendError::SelfFollow);
        }
        let user = self.get_profile_user(target).await?;

        self.repos
            .followings
            .delete(follower, &user.username)
            .await
            .map_err(|e| BackendError::internal("failed to delete following", e))?;

        tracing::info!("{} unfollowed {}", follower, user.username);
        Ok(profile_of(&user, false))
    }

    pub async fn is_following(&self, follower: &str, target: &str) -> Result<bool, BackendError> {
        self.repos
            .followings
            .exists(follower, target)
            .await
            .map_err(|e| BackendError::internal("following check failed", e))
    }

    /// `username`'s profile as seen by `viewer`
    pub async fn get_profile(
        &self,
        viewer: Option<&str>,
        username: &str,
    ) -> Result<Profile, BackendError> {
        let user = self.get_profile_user(username).await?;
        let following = match viewer {
            Some(viewer) => self.is_following(viewer, &user.username).await?,
            None => false,
        };
        Ok(profile_of(&user, following))
    }

    /// Profiles for a set of usernames, keyed by username
    ///
    /// Two batch reads regardless of how many usernames are asked for. A
    /// username with no row is simply absent from the map.
    pub async fn profiles(
        &self,
        viewer: Option<&str>,
        usernames: &[String],
    ) -> Result<HashMap<String, Profile>, BackendError> {
        if usernames.is_empty() {
            return Ok(HashMap::new());
        }

        let users = self
            .repos
            .users
            .find_by_usernames(usernames)
            .await
            .map_err(|e| BackendError::internal("failed to load authors", e))?;

        let followed = match viewer {
            Some(viewer) => self
                .repos
                .followings
                .followed_among(viewer, usernames)
                .await
                .map_err(|e| BackendError::internal("following check failed", e))?,
            None => Default::default(),
        };

        Ok(users
            .iter()
            .map(|user| {
                let following = followed.contains(&user.username);
                (user.username.clone(), profile_of(user, following))
            })
            .collect())
    }

    async fn get_profile_user(&self, username: &str) -> Result<UserRecord, BackendError> {
        self.repos
            .users
            .find_by_username(username)
            .await
            .map_err(|e| BackendError::from_repo("profile", e))
    }
}

pub(crate) fn profile_of(user: &UserRecord, following: bool) -> Profile {
    Profile {
        username: user.username.clone(),
        bio: user.bio.clone(),
        image: user.image.clone(),
        following,
    }
}

fn duplicate_user_error(err: RepoError) -> BackendError {
    match err {
        RepoError::UniqueViolation(Constraint::UserEmail) => BackendError::DuplicateEmail,
        RepoError::UniqueViolation(Constraint::UserUsername) => BackendError::DuplicateUsername,
        RepoError::NotFound => BackendError::not_found("user"),
        other => BackendError::internal("failed to write user", other),
    }
}
