//! Reviews and the one-review-per-user ledger embedded in each book.

use std::fmt;

use chrono::{DateTime, Utc};

use super::user::Username;

/// Returned when review text is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyReviewText;

impl fmt::Display for EmptyReviewText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "review text must not be empty")
    }
}

impl std::error::Error for EmptyReviewText {}

/// Free-form review body.
///
/// Text is kept exactly as submitted; only the empty string is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewText(String);

impl ReviewText {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyReviewText> {
        let value = value.into();
        if value.is_empty() {
            return Err(EmptyReviewText);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for ReviewText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A single user's review of a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    username: Username,
    text: ReviewText,
    date: DateTime<Utc>,
}

impl Review {
    pub fn new(username: Username, text: ReviewText, date: DateTime<Utc>) -> Self {
        Self {
            username,
            text,
            date,
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn text(&self) -> &ReviewText {
        &self.text
    }

    /// When the review was last created or replaced.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

/// The user has no review on this book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewNotFound;

/// Ordered review sequence with at most one entry per username.
///
/// Each user's review moves through two states, absent and present:
/// [`ReviewLedger::upsert`] always leaves it present,
/// [`ReviewLedger::update_text`] requires it present, and
/// [`ReviewLedger::remove`] moves it back to absent.
///
/// # Examples
/// ```
/// use bookstore::domain::{ReviewLedger, ReviewText, Username};
/// use chrono::Utc;
///
/// let alice = Username::new("alice").unwrap();
/// let mut ledger = ReviewLedger::default();
/// ledger.upsert(alice.clone(), ReviewText::new("Great").unwrap(), Utc::now());
/// ledger.upsert(alice.clone(), ReviewText::new("Even better").unwrap(), Utc::now());
/// assert_eq!(ledger.as_slice().len(), 1);
/// assert_eq!(ledger.find(&alice).unwrap().text().as_ref(), "Even better");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewLedger {
    reviews: Vec<Review>,
}

impl ReviewLedger {
    pub fn new(reviews: Vec<Review>) -> Self {
        Self { reviews }
    }

    pub fn as_slice(&self) -> &[Review] {
        &self.reviews
    }

    pub fn into_inner(self) -> Vec<Review> {
        self.reviews
    }

    pub fn find(&self, username: &Username) -> Option<&Review> {
        self.reviews.iter().find(|r| r.username() == username)
    }

    /// Drop any review by `username`, then append a fresh one dated `now`.
    ///
    /// A re-submitted review therefore moves to the end of the sequence.
    pub fn upsert(&mut self, username: Username, text: ReviewText, now: DateTime<Utc>) {
        self.reviews.retain(|r| r.username() != &username);
        self.reviews.push(Review::new(username, text, now));
    }

    /// Replace the text of the existing review in place. Position and date
    /// are unchanged.
    pub fn update_text(
        &mut self,
        username: &Username,
        text: ReviewText,
    ) -> Result<(), ReviewNotFound> {
        let review = self
            .reviews
            .iter_mut()
            .find(|r| r.username() == username)
            .ok_or(ReviewNotFound)?;
        review.text = text;
        Ok(())
    }

    /// Remove the review written by `username`.
    pub fn remove(&mut self, username: &Username) -> Result<(), ReviewNotFound> {
        let before = self.reviews.len();
        self.reviews.retain(|r| r.username() != username);
        if self.reviews.len() == before {
            return Err(ReviewNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn user(name: &str) -> Username {
        Username::new(name).expect("valid username")
    }

    fn text(body: &str) -> ReviewText {
        ReviewText::new(body).expect("valid text")
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn authors(ledger: &ReviewLedger) -> Vec<&str> {
        ledger
            .as_slice()
            .iter()
            .map(|r| r.username().as_ref())
            .collect()
    }

    #[fixture]
    fn alice_then_bob() -> ReviewLedger {
        let mut ledger = ReviewLedger::default();
        ledger.upsert(user("alice"), text("Great"), at(1));
        ledger.upsert(user("bob"), text("Fine"), at(2));
        ledger
    }

    #[rstest]
    fn review_text_rejects_empty() {
        assert_eq!(ReviewText::new(""), Err(EmptyReviewText));
    }

    #[rstest]
    #[case("   ")]
    #[case("\n")]
    fn whitespace_only_review_text_is_kept(#[case] raw: &str) {
        assert_eq!(text(raw).as_ref(), raw);
    }

    #[rstest]
    fn review_text_keeps_surrounding_whitespace() {
        assert_eq!(text("  spaced ").as_ref(), "  spaced ");
    }

    #[rstest]
    fn upsert_keeps_one_review_per_user() {
        let mut ledger = ReviewLedger::default();
        ledger.upsert(user("alice"), text("x"), at(1));
        ledger.upsert(user("alice"), text("y"), at(2));

        assert_eq!(ledger.as_slice().len(), 1);
        let review = ledger.find(&user("alice")).expect("present");
        assert_eq!(review.text().as_ref(), "y");
        assert_eq!(review.date(), at(2));
    }

    #[rstest]
    fn second_user_does_not_move_first(alice_then_bob: ReviewLedger) {
        assert_eq!(authors(&alice_then_bob), ["alice", "bob"]);
    }

    #[rstest]
    fn re_upsert_moves_review_to_end(mut alice_then_bob: ReviewLedger) {
        alice_then_bob.upsert(user("alice"), text("Even better"), at(3));
        assert_eq!(authors(&alice_then_bob), ["bob", "alice"]);
    }

    #[rstest]
    fn update_keeps_position_and_date(mut alice_then_bob: ReviewLedger) {
        alice_then_bob
            .update_text(&user("alice"), text("Revised"))
            .expect("alice has a review");

        assert_eq!(authors(&alice_then_bob), ["alice", "bob"]);
        let review = alice_then_bob.find(&user("alice")).expect("present");
        assert_eq!(review.text().as_ref(), "Revised");
        assert_eq!(review.date(), at(1));
    }

    #[rstest]
    fn update_requires_existing_review(mut alice_then_bob: ReviewLedger) {
        let before = alice_then_bob.clone();
        assert_eq!(
            alice_then_bob.update_text(&user("carol"), text("Hi")),
            Err(ReviewNotFound)
        );
        assert_eq!(alice_then_bob, before);
    }

    #[rstest]
    fn remove_twice_fails_second_time(mut alice_then_bob: ReviewLedger) {
        assert_eq!(alice_then_bob.remove(&user("alice")), Ok(()));
        assert_eq!(alice_then_bob.remove(&user("alice")), Err(ReviewNotFound));
        assert_eq!(authors(&alice_then_bob), ["bob"]);
    }

    #[rstest]
    fn remove_unknown_user_leaves_ledger_untouched(mut alice_then_bob: ReviewLedger) {
        assert_eq!(alice_then_bob.remove(&user("carol")), Err(ReviewNotFound));
        assert_eq!(alice_then_bob.as_slice().len(), 2);
    }
}
