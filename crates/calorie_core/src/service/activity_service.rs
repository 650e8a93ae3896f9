//! Activity use-case service.

use crate::model::activity::{Activity, NewActivity};
use crate::repo::activity_repo::ActivityRepository;
use crate::repo::RepoResult;
use crate::service::{validate_draft_id, ServiceResult};
use log::{info, warn};

/// Use-case service wrapper for activity operations.
pub struct ActivityService<R: ActivityRepository> {
    repo: R,
}

impl<R: ActivityRepository> ActivityService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an activity after checking its id against the handle schema.
    ///
    /// Missing name/intensity are left for storage to reject.
    pub fn create_activity(&self, activity: &NewActivity) -> ServiceResult<Activity> {
        validate_draft_id(activity.id.as_deref())?;
        self.repo.create_activity(activity).map_err(|err| {
            warn!("event=activity_create module=service status=error error={err}");
            err.into()
        })
    }

    pub fn get_activity(&self, id: &str) -> RepoResult<Option<Activity>> {
        self.repo.get_activity(id)
    }

    pub fn list_activities(&self) -> RepoResult<Vec<Activity>> {
        self.repo.list_activities()
    }

    pub fn update_activity(&self, activity: &Activity) -> RepoResult<()> {
        self.repo.update_activity(activity)
    }

    /// Deletes an activity and every record referencing it.
    pub fn delete_activity(&self, id: &str) -> RepoResult<()> {
        self.repo.delete_activity(id)?;
        info!("event=activity_delete module=service status=ok");
        Ok(())
    }
}
