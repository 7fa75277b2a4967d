//! Model of a single thread: the OP and every reply, in posting order.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// A collection of [`Post`]s representing one thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    posts: Vec<Post>,
}

impl Deref for Thread {
    type Target = Vec<Post>;

    fn deref(&self) -> &Self::Target {
        &self.posts
    }
}

impl Thread {
    /// Returns the original post of the thread, if the thread is non-empty.
    pub fn op(&self) -> Option<&Post> {
        self.posts.first()
    }

    /// Every attachment in the thread, in post order.
    pub fn attachments(&self) -> impl Iterator<Item = Attachment> + '_ {
        self.posts.iter().filter_map(Post::attachment)
    }
}

/// Represents a post in a thread, including its metadata, content, and
/// attachment fields when the post carries an image.
///
/// Only the fields this tool reads are modelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// The numeric post ID.
    no: u64,

    /// For replies: the ID of the thread being replied to. For OP posts: 0.
    #[serde(default)]
    resto: u64,

    /// Formatted string representing the time of post creation.
    #[serde(default)]
    now: String,

    /// UNIX timestamp (seconds since epoch) of post creation.
    #[serde(default)]
    time: u64,

    /// Name of the user who posted. Defaults to `Anonymous`.
    #[serde(default)]
    name: String,

    /// OP subject text, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,

    /// Comment (HTML escaped), if present.
    #[serde(default)]
    com: String,

    /// Number of replies in the thread. Present only on OP posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    replies: Option<u64>,

    /// Number of images in the thread. Present only on OP posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    images: Option<u64>,

    /// UNIX timestamp of image upload. Present only when the post has an
    /// attachment; doubles as the file's name on the media host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tim: Option<i64>,

    /// File extension, dot included. Present only with an attachment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ext: Option<String>,

    /// Filename as it appeared on the poster's device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filename: Option<String>,

    /// Size of the uploaded file in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fsize: Option<u64>,

    /// Packed base64 MD5 hash of the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    md5: Option<String>,

    /// Image width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    w: Option<i32>,

    /// Image height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    h: Option<i32>,
}

impl Post {
    /// Returns the numeric post ID.
    pub fn id(&self) -> u64 {
        self.no
    }

    /// Returns the post subject, if any.
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    /// Returns the post comment. Empty if the post had none.
    pub fn com(&self) -> &str {
        &self.com
    }

    /// Returns the post's attachment descriptor, if it has one.
    pub fn attachment(&self) -> Option<Attachment> {
        match (self.tim, self.ext.as_ref()) {
            (Some(tim), Some(ext)) => Some(Attachment {
                tim,
                ext: ext.clone(),
                filename: self.filename.clone().unwrap_or_default(),
            }),
            _ => None,
        }
    }
}

/// Descriptor of one image attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Upload timestamp id; the file's name on the media host.
    pub tim: i64,
    /// File extension, dot included (e.g. `.png`).
    pub ext: String,
    /// Filename as it appeared on the poster's device.
    pub filename: String,
}

impl Attachment {
    /// Name of the file on the media host, and on disk after download.
    pub fn remote_name(&self) -> String {
        format!("{}{}", self.tim, self.ext)
    }
}

#[cfg(test)]
mod tests {
    use super::Thread;

    const THREAD: &str = r#"{
        "posts": [
            {
                "no": 570368, "resto": 0, "now": "12/31/18(Mon)17:05:48",
                "time": 1546293948, "name": "Anonymous", "sub": "paper planes",
                "com": "post your best origami", "replies": 2, "images": 1,
                "tim": 1546293948883, "ext": ".jpg", "filename": "dart",
                "fsize": 56215, "md5": "uZUeZeB14FVR+Mc2ScHvVA==", "w": 800, "h": 600
            },
            { "no": 570370, "resto": 570368, "time": 1546294050, "name": "Anonymous", "com": "nice" }
        ]
    }"#;

    #[test]
    fn attachments_come_from_posts_with_files() {
        let thread: Thread = serde_json::from_str(THREAD).unwrap();
        let attachments: Vec<_> = thread.attachments().collect();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].remote_name(), "1546293948883.jpg");
        assert_eq!(attachments[0].filename, "dart");
    }

    #[test]
    fn op_is_the_first_post() {
        let thread: Thread = serde_json::from_str(THREAD).unwrap();
        assert_eq!(thread.op().map(super::Post::id), Some(570_368));
        assert_eq!(thread.len(), 2);
    }
}
