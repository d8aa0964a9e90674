use super::{Catalog, Listing};
use crate::compose::{QueryDescriptor, Route};
use crate::error::{ErrorKind, Result};
use crate::href::QueryParams;
use crate::opds::{Feed, Link, Metadata};
use crate::params::RawParams;
use exn::ResultExt;
use folio_search::{Scope, Subject};

impl Catalog {
    /// `/subjects`: a subject's publications (`id`), or the most used
    /// subjects.
    pub async fn subjects(&self, params: &RawParams) -> Result<Feed> {
        let descriptor = self.compose(Route::Subjects, params);
        match *descriptor.scope() {
            Scope::Subject(subject_id) => self.subject_listing(&descriptor, subject_id).await,
            _ => self.subject_navigation().await,
        }
    }

    async fn subject_listing(&self, descriptor: &QueryDescriptor, subject_id: u64) -> Result<Feed> {
        let name = self
            .engine
            .subject_name(subject_id)
            .await
            .inspect_err(|err| tracing::error!(subject = subject_id, error = ?err, "Subject lookup failed"))
            .or_raise(|| ErrorKind::SearchFailure(ErrorKind::BROWSE_FAILED))?;
        let listing = Listing {
            title: name.unwrap_or_else(|| format!("Subject {subject_id}")),
            up: self.href("subjects"),
            search: self.search_template("subjects", &QueryParams::new().with("id", subject_id.to_string())),
            failure: ErrorKind::BROWSE_FAILED,
            top_subjects: false,
        };
        self.leaf_listing(descriptor, listing).await
    }

    async fn subject_navigation(&self) -> Result<Feed> {
        let snapshot = self.cache.snapshot();
        let subjects = match snapshot.subjects() {
            Some(subjects) => subjects.to_vec(),
            None => {
                tracing::debug!("Subject ranking not cached, fetching live");
                let mut subjects = self
                    .engine
                    .list_subjects()
                    .await
                    .inspect_err(|err| tracing::error!(error = ?err, "Subject listing failed"))
                    .or_raise(|| ErrorKind::SearchFailure(ErrorKind::BROWSE_FAILED))?;
                Subject::rank(&mut subjects);
                subjects
            },
        };

        let navigation = subjects
            .iter()
            .take(self.config.subjects_nav_limit)
            .map(|subject| {
                let href = self.href_with("subjects", &QueryParams::new().with("id", subject.id.to_string()));
                Link::navigation(href, format!("{} ({} books)", subject.name, subject.book_count))
            })
            .collect();
        let mut feed = Feed::new(Metadata::counted("Subjects", subjects.len() as u64), vec![
            Link::new("self", self.href("subjects")),
            Link::new("start", self.root()),
            Link::new("up", self.root()),
        ]);
        feed.navigation = Some(navigation);
        Ok(feed)
    }
}
