//! Embedded social-media post dataset.
//!
//! The dashboard always works over the same twenty post records. They are
//! compiled into the binary and rebuilt on every call to [`load_data`], so
//! nothing here performs I/O or can fail.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Content format of a post.
///
/// Variant order is alphabetical so that `Ord` matches the group order used
/// by the per-type aggregations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    Carousel,
    Reel,
    StaticImage,
    Video,
}

impl PostType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Carousel => "carousel",
            Self::Reel => "reel",
            Self::StaticImage => "static_image",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject matter of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Dance,
    Fashion,
    Memes,
    Sports,
    Technology,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dance => "dance",
            Self::Fashion => "fashion",
            Self::Memes => "memes",
            Self::Sports => "sports",
            Self::Technology => "technology",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Post record
// ---------------------------------------------------------------------------

/// One row of the dataset. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub post_id: u32,
    pub post_type: PostType,
    pub topic: Topic,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub saves: u64,
    pub reach: u64,
    /// Precomputed engagement percentage.
    pub engagement_rate: f64,
}

/// Column names in table order.
pub const COLUMNS: [&str; 9] = [
    "post_id",
    "post_type",
    "topic",
    "likes",
    "comments",
    "shares",
    "saves",
    "reach",
    "engagement_rate",
];

/// First `post_id` in the dataset; ids are consecutive from here.
pub const FIRST_POST_ID: u32 = 101;

use PostType::{Carousel, Reel, StaticImage, Video};
use Topic::{Dance, Fashion, Memes, Sports, Technology};

// (post_type, topic, likes, comments, shares, saves, reach, engagement_rate)
type RawRow = (PostType, Topic, u64, u64, u64, u64, u64, f64);

const ROWS: [RawRow; 20] = [
    (Reel, Fashion, 2614, 4743, 2688, 1443, 6108, 8.8808),
    (Video, Technology, 5274, 5729, 322, 548, 29954, 0.3964),
    (Carousel, Fashion, 7593, 2044, 97, 588, 50988, 0.2024),
    (Video, Technology, 7852, 852, 576, 952, 20765, 0.4928),
    (Carousel, Technology, 1718, 453, 369, 282, 16666, 0.1693),
    (Carousel, Memes, 730, 1115, 405, 273, 3073, 2.821),
    (Reel, Sports, 9928, 4095, 1612, 1748, 91857, 3.1892),
    (Reel, Memes, 10288, 3224, 2824, 2353, 45656, 0.4093),
    (Carousel, Fashion, 1218, 1406, 501, 741, 1843, 2.0977),
    (Reel, Dance, 5304, 930, 1575, 573, 33798, 0.248),
    (Carousel, Technology, 3198, 783, 1085, 495, 31571, 0.1761),
    (StaticImage, Technology, 2206, 520, 313, 358, 17030, 0.1995),
    (StaticImage, Technology, 4365, 1057, 67, 86, 19326, 0.2885),
    (Video, Dance, 3086, 5185, 3815, 1086, 16349, 0.8057),
    (Video, Dance, 7508, 1116, 690, 457, 11993, 0.8147),
    (Reel, Memes, 8472, 887, 2248, 1006, 74735, 1.1688),
    (Video, Fashion, 3065, 1838, 1589, 395, 20911, 0.3293),
    (Carousel, Memes, 4154, 1220, 1015, 612, 7335, 0.9545),
    (Carousel, Memes, 1211, 362, 418, 278, 4680, 0.4848),
    (Reel, Technology, 8764, 941, 3677, 1751, 20255, 0.7471),
];

/// Return the fixed post dataset.
///
/// Always twenty rows with `post_id` 101..=120 in ascending order.
pub fn load_data() -> Vec<PostRecord> {
    ROWS.iter()
        .zip(FIRST_POST_ID..)
        .map(
            |(&(post_type, topic, likes, comments, shares, saves, reach, engagement_rate), post_id)| {
                PostRecord {
                    post_id,
                    post_type,
                    topic,
                    likes,
                    comments,
                    shares,
                    saves,
                    reach,
                    engagement_rate,
                }
            },
        )
        .collect()
}

// ---------------------------------------------------------------------------
// Column helpers
// ---------------------------------------------------------------------------

/// Arithmetic mean of a column, `0.0` for an empty slice.
pub fn mean_by<F>(rows: &[PostRecord], column: F) -> f64
where
    F: Fn(&PostRecord) -> f64,
{
    if rows.is_empty() {
        return 0.0;
    }
    rows.iter().map(column).sum::<f64>() / rows.len() as f64
}

/// Exact integer sum of a counter column.
pub fn sum_by<F>(rows: &[PostRecord], column: F) -> u64
where
    F: Fn(&PostRecord) -> u64,
{
    rows.iter().map(column).sum()
}

/// Render a row as CSV fields in column order.
pub fn to_csv_line(row: &PostRecord) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{}",
        row.post_id,
        row.post_type,
        row.topic,
        row.likes,
        row.comments,
        row.shares,
        row.saves,
        row.reach,
        row.engagement_rate,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
