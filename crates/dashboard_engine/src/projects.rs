use models::{ProjectRecord, ProjectStatus, StatusTally};

/// Counts projects per known status.
///
/// A missing status counts as `Pending`. A label that is not one of the four
/// known statuses is left out of the tally altogether.
pub fn tally_by_status(projects: &[ProjectRecord]) -> StatusTally {
    let mut tally = StatusTally::default();
    for project in projects {
        match ProjectStatus::classify(&project.status) {
            Some(status) => tally.increment(status),
            None => tracing::debug!(
                project = %project.id,
                status = %project.status,
                "project status not tallied"
            ),
        }
    }
    tally
}

/// Projects whose status is exactly "In Progress" (or "InProgress").
pub fn count_active(projects: &[ProjectRecord]) -> usize {
    projects
        .iter()
        .filter(|p| matches!(p.status.as_str(), "In Progress" | "InProgress"))
        .count()
}

/// Projects left out of [`tally_by_status`].
pub fn count_unclassified(projects: &[ProjectRecord]) -> usize {
    projects
        .iter()
        .filter(|p| ProjectStatus::classify(&p.status).is_none())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects(statuses: &[&str]) -> Vec<ProjectRecord> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, s)| ProjectRecord::new(format!("p{i}"), format!("Project {i}"), *s))
            .collect()
    }

    #[test]
    fn test_tally_drops_unknown_status() {
        let list = projects(&["Completed", "InProgress", "InProgress", "Bogus"]);
        let tally = tally_by_status(&list);
        assert_eq!(
            tally,
            StatusTally {
                completed: 1,
                in_progress: 2,
                pending: 0,
                delayed: 0,
            }
        );
        assert_eq!(tally.total(), 3);
        assert_eq!(count_unclassified(&list), 1);
        assert_eq!(count_active(&list), 2);
    }

    #[test]
    fn test_missing_status_counts_as_pending() {
        let list = projects(&["", "Delayed", "In Progress"]);
        let tally = tally_by_status(&list);
        assert_eq!(tally.pending, 1);
        assert_eq!(tally.delayed, 1);
        assert_eq!(tally.in_progress, 1);
        assert_eq!(count_unclassified(&list), 0);
    }

    #[test]
    fn test_status_match_is_case_sensitive() {
        let list = projects(&["in progress", "COMPLETED", "pending"]);
        assert_eq!(tally_by_status(&list).total(), 0);
        assert_eq!(count_active(&list), 0);
        assert_eq!(count_unclassified(&list), 3);
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(tally_by_status(&[]), StatusTally::default());
        assert_eq!(count_active(&[]), 0);
    }
}
