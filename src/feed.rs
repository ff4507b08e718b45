use chrono_tz::Tz;
use serde::Serialize;

use crate::db::DbPool;
use crate::models::comment::Comment;
use crate::models::post::Post;
use crate::models::section::Section;
use crate::models::tag::Tag;
use crate::models::user::{User, UserSummary};
use crate::timefmt;

/// A comment plus its display timestamp. Also the JSON payload returned
/// by the comment-submission endpoint.
#[derive(Debug, Serialize, Clone)]
pub struct CommentView {
    pub commentid: i64,
    pub postid: i64,
    pub username: String,
    pub commenttext: String,
    pub formatted_create_time: String,
}

impl CommentView {
    pub fn from_comment(comment: &Comment, tz: Tz) -> Self {
        CommentView {
            commentid: comment.commentid,
            postid: comment.postid,
            username: comment.username.clone(),
            commenttext: comment.commenttext.clone(),
            formatted_create_time: timefmt::format_create_time(&comment.createtime, tz),
        }
    }
}

/// Everything needed to render one post: the row itself, its owner's
/// public fields, comments and sections in createtime order, and tag
/// names. Built by `assemble` for both the single-post page and the
/// per-user feed so the two call sites cannot drift apart.
#[derive(Debug, Serialize)]
pub struct PostBundle {
    pub post: Post,
    pub formatted_create_time: String,
    pub author: Option<UserSummary>,
    pub comments: Vec<CommentView>,
    pub tags: Vec<String>,
    pub sections: Vec<Section>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AssembleError {
    /// The post row is gone — distinct from a store failure because the
    /// user-feed page words the two cases differently.
    PostMissing,
    Store(String),
}

/// One post lookup, one owner lookup, ordered comments, joined tags,
/// ordered sections. Not transactional; a row deleted mid-assembly
/// surfaces as `PostMissing`.
pub fn assemble(pool: &DbPool, postid: i64, tz: Tz) -> Result<PostBundle, AssembleError> {
    let post = match Post::find_checked(pool, postid) {
        Ok(Some(post)) => post,
        Ok(None) => return Err(AssembleError::PostMissing),
        Err(e) => return Err(AssembleError::Store(e)),
    };

    let author = User::summary(pool, &post.username);
    let comments = Comment::for_post(pool, postid)
        .iter()
        .map(|c| CommentView::from_comment(c, tz))
        .collect();
    let tags = Tag::names_for_post(pool, postid);
    let sections = Section::for_post(pool, postid);
    let formatted_create_time = timefmt::format_create_time(&post.createtime, tz);

    Ok(PostBundle {
        post,
        formatted_create_time,
        author,
        comments,
        tags,
        sections,
    })
}
