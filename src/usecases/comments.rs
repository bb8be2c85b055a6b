use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::middleware::Session,
    dto::comments::{
        ApproveCommentResponse, CommentResponse, CreateCommentRequest, CreateCommentResponse,
        DeleteCommentResponse, PendingCommentResponse,
    },
    error::AppError,
    models::{
        comments::DEFAULT_COMMENT_AVATAR,
        users::{User, UserRole},
    },
    repositories::{
        comments as comment_repo, comments::CreateCommentParams, posts as post_repo,
        users as user_repo,
    },
    services::censor::{CensorService, Verdict},
    telemetry::BusinessEvent,
};

pub struct CommentService;

/// A reply whose parent chain already counts this many ancestors is rejected.
pub(crate) const MAX_REPLY_DEPTH: usize = 5;

/// Capabilities an operation sees after resolving the caller's session
/// against core.user. OAuth-only visitors have a session but no user row and
/// therefore act anonymously here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CommentActor {
    Anonymous,
    Registered { id: Uuid, username: String },
    Admin { id: Uuid, username: String },
}

impl CommentActor {
    fn from_user(user: Option<User>) -> Self {
        match user {
            None => CommentActor::Anonymous,
            Some(user) if user.role == UserRole::Admin => CommentActor::Admin {
                id: user.id,
                username: user.username,
            },
            Some(user) => CommentActor::Registered {
                id: user.id,
                username: user.username,
            },
        }
    }

    fn user_id(&self) -> Option<Uuid> {
        match self {
            CommentActor::Anonymous => None,
            CommentActor::Registered { id, .. } | CommentActor::Admin { id, .. } => Some(*id),
        }
    }

    fn admin_id(&self) -> Option<Uuid> {
        match self {
            CommentActor::Admin { id, .. } => Some(*id),
            _ => None,
        }
    }
}

impl CommentService {
    pub async fn create_comment(
        pool: &PgPool,
        censor: Option<&CensorService>,
        post_id: Uuid,
        session: Option<&Session>,
        req: CreateCommentRequest,
    ) -> Result<CreateCommentResponse, AppError> {
        let content = require_field(&req.content, "Comment content is required")?;
        let author_name = require_field(&req.author, "Author name is required")?;
        let author_email = require_field(&req.email, "Author email is required")?;
        if !is_plausible_email(&author_email) {
            return Err(AppError::ValidationError(
                "Author email is invalid".to_string(),
            ));
        }

        let post = post_repo::find_post_by_id(pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        if let Some(parent_id) = req.parent_id {
            let hops = ancestor_hops(
                |id| {
                    let pool = pool.clone();
                    async move {
                        Ok(comment_repo::find_comment_by_id(&pool, id)
                            .await?
                            .map(|comment| comment.parent_id))
                    }
                },
                parent_id,
            )
            .await?;
            if hops >= MAX_REPLY_DEPTH {
                return Err(AppError::BadRequest("Reply nesting too deep".to_string()));
            }
        }

        let actor = resolve_actor(pool, session).await?;

        // Trusted actors publish directly; everyone else goes through the
        // moderation gateway, and a gateway failure holds the comment for
        // manual review instead of publishing it.
        let approved = if is_trusted(&actor, &post.author) {
            true
        } else {
            let outcome = match censor {
                Some(censor) => censor.censor(&content).await,
                None => Err(AppError::ExternalService(
                    "Content moderation not configured".to_string(),
                )),
            };
            if let Err(err) = &outcome {
                warn!(error = %err, "Moderation check failed, holding comment for review");
            }
            approval_for_untrusted(outcome)
        };

        let website = normalize_optional(req.website);
        let avatar = normalize_optional(req.avatar)
            .unwrap_or_else(|| DEFAULT_COMMENT_AVATAR.to_string());

        let comment = comment_repo::create_comment(
            pool,
            CreateCommentParams {
                post_id,
                user_id: actor.user_id(),
                parent_id: req.parent_id,
                content,
                author_name,
                author_email,
                website,
                avatar,
                approved,
            },
        )
        .await?;

        BusinessEvent::CommentCreated {
            comment_id: comment.id,
            post_id,
            approved: comment.approved,
            registered: comment.user_id.is_some(),
        }
        .log();

        Ok(CreateCommentResponse {
            message: creation_status(comment.approved).to_string(),
            comment: CommentResponse::from(comment),
        })
    }

    pub async fn delete_comment(
        pool: &PgPool,
        comment_id: Uuid,
        session: &Session,
    ) -> Result<DeleteCommentResponse, AppError> {
        let comment = comment_repo::find_comment_by_id(pool, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        let actor = resolve_actor(pool, Some(session)).await?;
        let post = post_repo::find_post_by_id(pool, comment.post_id).await?;
        let post_author = post.as_ref().map(|post| post.author.as_str());
        if !may_delete(&actor, post_author, comment.user_id) {
            return Err(AppError::Forbidden(
                "Not allowed to delete this comment".to_string(),
            ));
        }

        let subtree = collect_subtree(
            |id| {
                let pool = pool.clone();
                async move { comment_repo::list_child_ids(&pool, id).await }
            },
            comment_id,
        )
        .await?;

        // Reverse of the walk order deletes children before parents. Rows
        // already removed by a concurrent delete count as removed here.
        let mut tx = pool.begin().await?;
        let mut removed = 0u64;
        for id in subtree.iter().rev() {
            removed += comment_repo::delete_comment_tx(&mut tx, *id).await?;
        }
        tx.commit().await?;

        BusinessEvent::CommentDeleted {
            comment_id,
            removed: removed as usize,
        }
        .log();

        Ok(DeleteCommentResponse {
            message: "Comment deleted".to_string(),
        })
    }

    pub async fn approve_comment(
        pool: &PgPool,
        comment_id: Uuid,
        session: &Session,
    ) -> Result<ApproveCommentResponse, AppError> {
        let actor = resolve_actor(pool, Some(session)).await?;
        let admin_id = actor.admin_id().ok_or_else(|| {
            AppError::Forbidden("Only admins can approve comments".to_string())
        })?;

        // Idempotent: re-approving an approved comment succeeds.
        let comment = comment_repo::approve_comment(pool, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        BusinessEvent::CommentApproved {
            comment_id: comment.id,
            admin_id,
        }
        .log();

        Ok(ApproveCommentResponse {
            id: comment.id,
            approved: comment.approved,
            message: "Comment approved".to_string(),
        })
    }

    pub async fn list_pending(
        pool: &PgPool,
        session: &Session,
    ) -> Result<Vec<PendingCommentResponse>, AppError> {
        let actor = resolve_actor(pool, Some(session)).await?;
        if actor.admin_id().is_none() {
            return Err(AppError::Forbidden(
                "Only admins can view pending comments".to_string(),
            ));
        }

        let rows = comment_repo::list_pending(pool).await?;
        Ok(rows.into_iter().map(PendingCommentResponse::from).collect())
    }

    pub async fn list_all(
        pool: &PgPool,
        session: &Session,
    ) -> Result<Vec<CommentResponse>, AppError> {
        let actor = resolve_actor(pool, Some(session)).await?;
        if actor.admin_id().is_none() {
            return Err(AppError::Forbidden(
                "Only admins can view all comments".to_string(),
            ));
        }

        let rows = comment_repo::list_all(pool).await?;
        Ok(rows.into_iter().map(CommentResponse::from).collect())
    }

    pub async fn list_approved_for_post(
        pool: &PgPool,
        post_id: Uuid,
    ) -> Result<Vec<CommentResponse>, AppError> {
        if !post_repo::post_exists(pool, post_id).await? {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        let rows = comment_repo::list_approved_for_post(pool, post_id).await?;
        Ok(rows.into_iter().map(CommentResponse::from).collect())
    }
}

pub(crate) async fn resolve_actor(
    pool: &PgPool,
    session: Option<&Session>,
) -> Result<CommentActor, AppError> {
    let Some(session) = session else {
        return Ok(CommentActor::Anonymous);
    };
    let user = user_repo::find_user_by_username(pool, &session.username).await?;
    Ok(CommentActor::from_user(user))
}

/// Admins and the owning post's author publish without moderation.
fn is_trusted(actor: &CommentActor, post_author: &str) -> bool {
    match actor {
        CommentActor::Admin { .. } => true,
        CommentActor::Registered { username, .. } => username == post_author,
        CommentActor::Anonymous => false,
    }
}

/// Fail-closed: only an affirmative compliant verdict publishes.
fn approval_for_untrusted(outcome: Result<Verdict, AppError>) -> bool {
    matches!(outcome, Ok(Verdict::Compliant))
}

fn may_delete(
    actor: &CommentActor,
    post_author: Option<&str>,
    comment_user_id: Option<Uuid>,
) -> bool {
    match actor {
        CommentActor::Admin { .. } => true,
        CommentActor::Registered { id, username } => {
            post_author == Some(username.as_str()) || comment_user_id == Some(*id)
        }
        CommentActor::Anonymous => false,
    }
}

fn creation_status(approved: bool) -> &'static str {
    if approved {
        "Comment published"
    } else {
        "Comment submitted and awaiting review"
    }
}

/// Counts ancestor hops above the comment `first`, following parent pointers
/// through `parent_of` until a root is reached or the cap is hit. The lookup
/// yields `None` for a missing comment and `Some(parent_id)` otherwise.
async fn ancestor_hops<F, Fut>(mut parent_of: F, first: Uuid) -> Result<usize, AppError>
where
    F: FnMut(Uuid) -> Fut,
    Fut: std::future::Future<Output = Result<Option<Option<Uuid>>, AppError>>,
{
    let mut hops = 0usize;
    let mut current = first;
    loop {
        let parent = parent_of(current)
            .await?
            .ok_or_else(|| AppError::BadRequest("Parent comment not found".to_string()))?;
        match parent {
            None => break,
            Some(next) => {
                hops += 1;
                if hops >= MAX_REPLY_DEPTH {
                    break;
                }
                current = next;
            }
        }
    }
    Ok(hops)
}

/// Walks the subtree rooted at `root` with an explicit frontier, never
/// recursion. The returned order lists every parent before its children, so
/// the reverse is safe for deletion.
async fn collect_subtree<F, Fut>(mut children_of: F, root: Uuid) -> Result<Vec<Uuid>, AppError>
where
    F: FnMut(Uuid) -> Fut,
    Fut: std::future::Future<Output = Result<Vec<Uuid>, AppError>>,
{
    let mut ordered = vec![root];
    let mut cursor = 0usize;
    while cursor < ordered.len() {
        let id = ordered[cursor];
        cursor += 1;
        let children = children_of(id).await?;
        ordered.extend(children);
    }
    Ok(ordered)
}

fn require_field(value: &str, message: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(message.to_string()));
    }
    Ok(trimmed.to_string())
}

fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn admin() -> CommentActor {
        CommentActor::Admin {
            id: Uuid::new_v4(),
            username: "root".to_string(),
        }
    }

    fn registered(username: &str) -> CommentActor {
        CommentActor::Registered {
            id: Uuid::new_v4(),
            username: username.to_string(),
        }
    }

    #[test]
    fn admins_and_post_authors_are_trusted() {
        assert!(is_trusted(&admin(), "alice"));
        assert!(is_trusted(&registered("alice"), "alice"));
        assert!(!is_trusted(&registered("bob"), "alice"));
        assert!(!is_trusted(&CommentActor::Anonymous, "alice"));
    }

    #[test]
    fn untrusted_approval_requires_compliant_verdict() {
        assert!(approval_for_untrusted(Ok(Verdict::Compliant)));
        assert!(!approval_for_untrusted(Ok(Verdict::NonCompliant)));
        assert!(!approval_for_untrusted(Err(AppError::ExternalService(
            "gateway down".to_string()
        ))));
    }

    #[test]
    fn delete_is_limited_to_admin_post_author_and_comment_owner() {
        let owner_id = Uuid::new_v4();
        let owner = CommentActor::Registered {
            id: owner_id,
            username: "bob".to_string(),
        };

        assert!(may_delete(&admin(), Some("alice"), None));
        assert!(may_delete(&registered("alice"), Some("alice"), None));
        assert!(may_delete(&owner, Some("alice"), Some(owner_id)));
        assert!(!may_delete(&registered("carol"), Some("alice"), Some(owner_id)));
        assert!(!may_delete(&CommentActor::Anonymous, Some("alice"), Some(owner_id)));
    }

    #[test]
    fn comment_owner_can_delete_even_without_post() {
        let owner_id = Uuid::new_v4();
        let owner = CommentActor::Registered {
            id: owner_id,
            username: "bob".to_string(),
        };
        assert!(may_delete(&owner, None, Some(owner_id)));
    }

    #[test]
    fn anonymous_comments_have_no_owner_to_delete_as() {
        assert!(!may_delete(&registered("bob"), Some("alice"), None));
    }

    #[test]
    fn status_message_distinguishes_published_from_pending() {
        assert_eq!(creation_status(true), "Comment published");
        assert_eq!(
            creation_status(false),
            "Comment submitted and awaiting review"
        );
    }

    #[test]
    fn required_fields_are_trimmed() {
        assert_eq!(require_field("  hello ", "msg").unwrap(), "hello");
        assert!(matches!(
            require_field("   ", "msg"),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn email_plausibility() {
        assert!(is_plausible_email("bob@example.com"));
        assert!(!is_plausible_email("bob"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("bob@nodot"));
    }

    #[test]
    fn blank_optional_fields_become_none() {
        assert_eq!(normalize_optional(Some("  ".to_string())), None);
        assert_eq!(
            normalize_optional(Some(" https://b.example ".to_string())).as_deref(),
            Some("https://b.example")
        );
    }

    /// Builds a parent chain root -> a -> b -> ... and returns the node ids
    /// in order, root first.
    fn chain(len: usize) -> (HashMap<Uuid, Option<Uuid>>, Vec<Uuid>) {
        let mut parents = HashMap::new();
        let mut ids = Vec::new();
        let mut previous: Option<Uuid> = None;
        for _ in 0..len {
            let id = Uuid::new_v4();
            parents.insert(id, previous);
            ids.push(id);
            previous = Some(id);
        }
        (parents, ids)
    }

    fn parent_lookup(
        parents: HashMap<Uuid, Option<Uuid>>,
    ) -> impl FnMut(Uuid) -> std::future::Ready<Result<Option<Option<Uuid>>, AppError>> {
        move |id| std::future::ready(Ok(parents.get(&id).copied()))
    }

    #[tokio::test]
    async fn reply_to_root_comment_counts_zero_hops() {
        let (parents, ids) = chain(1);
        let hops = ancestor_hops(parent_lookup(parents), ids[0]).await.unwrap();
        assert_eq!(hops, 0);
    }

    #[tokio::test]
    async fn reply_to_fifth_node_is_still_allowed() {
        // root -> a -> b -> c -> d; replying to d nests one level deeper.
        let (parents, ids) = chain(5);
        let hops = ancestor_hops(parent_lookup(parents), ids[4]).await.unwrap();
        assert_eq!(hops, 4);
        assert!(hops < MAX_REPLY_DEPTH);
    }

    #[tokio::test]
    async fn node_with_five_ancestors_hits_the_cap() {
        // root -> a -> b -> c -> d -> e; e already has five ancestors.
        let (parents, ids) = chain(6);
        let hops = ancestor_hops(parent_lookup(parents), ids[5]).await.unwrap();
        assert_eq!(hops, MAX_REPLY_DEPTH);
    }

    #[tokio::test]
    async fn walk_stops_counting_at_the_cap() {
        let (parents, ids) = chain(20);
        let hops = ancestor_hops(parent_lookup(parents), ids[19]).await.unwrap();
        assert_eq!(hops, MAX_REPLY_DEPTH);
    }

    #[tokio::test]
    async fn missing_parent_is_reported() {
        let (parents, _) = chain(2);
        let result = ancestor_hops(parent_lookup(parents), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    fn child_lookup(
        children: HashMap<Uuid, Vec<Uuid>>,
    ) -> impl FnMut(Uuid) -> std::future::Ready<Result<Vec<Uuid>, AppError>> {
        move |id| std::future::ready(Ok(children.get(&id).cloned().unwrap_or_default()))
    }

    #[tokio::test]
    async fn subtree_collection_covers_every_descendant() {
        // root has two children; one child has two children of its own.
        let root = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let (a1, a2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut children = HashMap::new();
        children.insert(root, vec![a, b]);
        children.insert(a, vec![a1, a2]);

        let ordered = collect_subtree(child_lookup(children), root).await.unwrap();

        assert_eq!(ordered.len(), 5);
        assert_eq!(ordered[0], root);
        for (parent, child) in [(root, a), (root, b), (a, a1), (a, a2)] {
            let parent_pos = ordered.iter().position(|id| *id == parent).unwrap();
            let child_pos = ordered.iter().position(|id| *id == child).unwrap();
            assert!(
                parent_pos < child_pos,
                "parent must precede child so the reversed order deletes leaf-first"
            );
        }
    }

    #[tokio::test]
    async fn subtree_of_a_leaf_is_just_the_leaf() {
        let root = Uuid::new_v4();
        let ordered = collect_subtree(child_lookup(HashMap::new()), root)
            .await
            .unwrap();
        assert_eq!(ordered, vec![root]);
    }

    #[tokio::test]
    async fn vanished_children_do_not_fail_the_walk() {
        // A node listed as a child but already deleted simply reads as a leaf.
        let root = Uuid::new_v4();
        let ghost = Uuid::new_v4();
        let mut children = HashMap::new();
        children.insert(root, vec![ghost]);

        let ordered = collect_subtree(child_lookup(children), root).await.unwrap();
        assert_eq!(ordered, vec![root, ghost]);
    }
}
