#[cfg(test)]
mod tests {
    use crate::{
        build_payload, resolve_subreddit, two_factor_code, Sanitizer, SelectionEngine,
        SentenceSplitter, UndoneTracker,
    };
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet, VecDeque};
    use threadpick_core::{
        Candidate, CommentNode, ContentMode, CoreError, InputProvider, NarrationMode,
        PayloadContent, ProcessedStore, RankedListing, RedditApiError, RedditComment, RedditPost,
        RelevanceConfig, RelevanceRanker, SeenTracker, SelectionConfig, SelectionError, SortOrder,
        StoryText, ThreadSource, TimeWindow,
    };

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        ById(String),
        Listing(String, SortOrder, u32),
        Top(TimeWindow, u32),
        Replies(String),
    }

    #[derive(Default)]
    struct FakeSource {
        by_id: HashMap<String, RedditPost>,
        listing: Vec<RedditPost>,
        top: HashMap<TimeWindow, Vec<RedditPost>>,
        replies: HashMap<String, Vec<CommentNode>>,
        calls: RefCell<Vec<Call>>,
    }

    impl FakeSource {
        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn listing_calls(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| matches!(c, Call::Listing(..)))
                .count()
        }
    }

    impl ThreadSource for FakeSource {
        async fn fetch_by_id(&self, id: &str) -> Result<RedditPost, CoreError> {
            self.calls.borrow_mut().push(Call::ById(id.to_string()));
            self.by_id.get(id).cloned().ok_or_else(|| {
                RedditApiError::PostNotFound {
                    post_id: id.to_string(),
                }
                .into()
            })
        }

        async fn fetch_listing(
            &self,
            subreddit: &str,
            sort: SortOrder,
            limit: u32,
        ) -> Result<Vec<RedditPost>, CoreError> {
            self.calls
                .borrow_mut()
                .push(Call::Listing(subreddit.to_string(), sort, limit));
            Ok(self.listing.clone())
        }

        async fn fetch_top(
            &self,
            _subreddit: &str,
            window: TimeWindow,
            limit: u32,
        ) -> Result<Vec<RedditPost>, CoreError> {
            self.calls.borrow_mut().push(Call::Top(window, limit));
            Ok(self.top.get(&window).cloned().unwrap_or_default())
        }

        async fn fetch_replies(&self, thread_id: &str) -> Result<Vec<CommentNode>, CoreError> {
            self.calls
                .borrow_mut()
                .push(Call::Replies(thread_id.to_string()));
            Ok(self.replies.get(thread_id).cloned().unwrap_or_default())
        }
    }

    /// Hands out scripted answers, then falls back to the listing head.
    #[derive(Default)]
    struct ScriptedTracker {
        answers: RefCell<VecDeque<Option<Candidate>>>,
        seen_scores: RefCell<Vec<Option<Vec<f32>>>>,
    }

    impl ScriptedTracker {
        fn new(answers: Vec<Option<RedditPost>>) -> Self {
            let answers = answers
                .into_iter()
                .map(|post| {
                    post.map(|post| Candidate {
                        post,
                        similarity: None,
                    })
                })
                .collect();
            Self {
                answers: RefCell::new(answers),
                seen_scores: RefCell::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.seen_scores.borrow().len()
        }
    }

    impl SeenTracker for ScriptedTracker {
        async fn first_unprocessed(
            &self,
            listing: Vec<RedditPost>,
            _subreddit: &str,
            scores: Option<Vec<f32>>,
        ) -> Result<Option<Candidate>, CoreError> {
            self.seen_scores.borrow_mut().push(scores.clone());
            match self.answers.borrow_mut().pop_front() {
                Some(answer) => Ok(answer),
                None => Ok(listing.into_iter().next().map(|post| Candidate {
                    similarity: scores.and_then(|s| s.first().copied()),
                    post,
                })),
            }
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        processed: HashSet<String>,
    }

    impl MemoryStore {
        fn with(ids: &[&str]) -> Self {
            Self {
                processed: ids.iter().map(|id| id.to_string()).collect(),
            }
        }
    }

    impl ProcessedStore for MemoryStore {
        async fn is_processed(&self, thread_id: &str) -> Result<bool, CoreError> {
            Ok(self.processed.contains(thread_id))
        }
    }

    /// Scores threads by how many keywords appear in their title.
    struct TitleMatchRanker;

    impl RelevanceRanker for TitleMatchRanker {
        fn rank(
            &self,
            listing: Vec<RedditPost>,
            keywords: &[String],
        ) -> Result<RankedListing, CoreError> {
            let mut scored: Vec<(RedditPost, f32)> = listing
                .into_iter()
                .map(|post| {
                    let title = post.title.to_lowercase();
                    let hits = keywords.iter().filter(|k| title.contains(k.as_str())).count();
                    (post, hits as f32 / keywords.len() as f32)
                })
                .collect();
            scored.sort_by(|a, b| b.1.total_cmp(&a.1));
            let (posts, scores) = scored.into_iter().unzip();
            Ok(RankedListing::new(posts, scores).expect("aligned"))
        }
    }

    struct ScriptedInput {
        answers: RefCell<VecDeque<String>>,
        asked: RefCell<Vec<String>>,
    }

    impl ScriptedInput {
        fn new(answers: &[&str]) -> Self {
            Self {
                answers: RefCell::new(answers.iter().map(|a| a.to_string()).collect()),
                asked: RefCell::new(Vec::new()),
            }
        }
    }

    impl InputProvider for ScriptedInput {
        fn prompt(&self, message: &str) -> Result<String, CoreError> {
            self.asked.borrow_mut().push(message.to_string());
            Ok(self.answers.borrow_mut().pop_front().unwrap_or_default())
        }
    }

    fn thread(id: &str, score: i64, num_comments: u64) -> RedditPost {
        RedditPost {
            id: id.to_string(),
            title: format!("Thread {}", id),
            permalink: format!("/r/AskReddit/comments/{}/thread_{}/", id, id),
            selftext: String::new(),
            score,
            upvote_ratio: 0.95,
            num_comments,
            over_18: false,
            stickied: false,
            is_self: true,
        }
    }

    fn reply(id: &str, body: &str, score: i64) -> CommentNode {
        CommentNode::Comment(RedditComment {
            id: id.to_string(),
            body: body.to_string(),
            permalink: format!("/r/AskReddit/comments/t/_/{}/", id),
            score,
            author: Some("author".to_string()),
            stickied: false,
        })
    }

    fn story_config(method: NarrationMode) -> SelectionConfig {
        SelectionConfig {
            mode: ContentMode::Story(method),
            ..SelectionConfig::default()
        }
    }

    static SANITIZER: Sanitizer = Sanitizer::new(false);
    static NARRATOR: SentenceSplitter = SentenceSplitter::new(Sanitizer::new(false));

    fn engine<'a, Trk: SeenTracker>(
        config: &'a SelectionConfig,
        source: &'a FakeSource,
        tracker: &'a Trk,
        store: &'a MemoryStore,
    ) -> SelectionEngine<'a, FakeSource, Trk, MemoryStore> {
        SelectionEngine::new(
            config, "AskReddit", source, tracker, store, &SANITIZER, &NARRATOR,
        )
    }

    #[tokio::test]
    async fn test_direct_reference_skips_listing_and_tracker() {
        let config = SelectionConfig {
            post_ids: vec!["abc123".to_string()],
            ..SelectionConfig::default()
        };
        let source = FakeSource {
            by_id: HashMap::from([("abc123".to_string(), thread("abc123", 50, 10))]),
            listing: vec![thread("other", 50, 100)],
            ..FakeSource::default()
        };
        let tracker = ScriptedTracker::default();
        let store = MemoryStore::default();

        let candidate = engine(&config, &source, &tracker, &store)
            .select(None)
            .await
            .unwrap();

        assert_eq!(candidate.post.id, "abc123");
        assert_eq!(candidate.similarity, None);
        assert_eq!(source.calls(), vec![Call::ById("abc123".to_string())]);
        assert_eq!(tracker.call_count(), 0);
    }

    #[tokio::test]
    async fn test_queued_id_overrides_configured_ids() {
        let config = SelectionConfig {
            post_ids: vec!["first".to_string(), "second".to_string()],
            ..SelectionConfig::default()
        };
        let source = FakeSource {
            by_id: HashMap::from([("second".to_string(), thread("second", 5, 3))]),
            ..FakeSource::default()
        };
        let tracker = ScriptedTracker::default();
        let store = MemoryStore::default();

        let candidate = engine(&config, &source, &tracker, &store)
            .select(Some("second"))
            .await
            .unwrap();
        assert_eq!(candidate.post.id, "second");
        assert_eq!(source.listing_calls(), 0);
    }

    #[tokio::test]
    async fn test_ordered_search_uses_configured_sort() {
        let config = SelectionConfig {
            sort_order: SortOrder::Rising,
            ..SelectionConfig::default()
        };
        let source = FakeSource {
            listing: vec![thread("r1", 10, 40)],
            ..FakeSource::default()
        };
        let tracker = ScriptedTracker::default();
        let store = MemoryStore::default();

        let candidate = engine(&config, &source, &tracker, &store)
            .select(None)
            .await
            .unwrap();

        assert_eq!(candidate.post.id, "r1");
        assert_eq!(
            source.calls(),
            vec![Call::Listing("AskReddit".to_string(), SortOrder::Rising, 25)]
        );
        assert_eq!(*tracker.seen_scores.borrow(), vec![None]);
    }

    #[tokio::test]
    async fn test_relevance_search_ranks_hot_listing_and_carries_score() {
        let config = SelectionConfig {
            sort_order: SortOrder::New,
            relevance: Some(RelevanceConfig {
                keywords: vec!["cats".to_string(), "dogs".to_string()],
                model_dir: "unused".into(),
            }),
            ..SelectionConfig::default()
        };
        let mut pets = thread("pets", 10, 40);
        pets.title = "Cats or dogs?".to_string();
        let mut cars = thread("cars", 10, 40);
        cars.title = "Best cars".to_string();
        let source = FakeSource {
            listing: vec![cars, pets],
            ..FakeSource::default()
        };
        let tracker = ScriptedTracker::default();
        let store = MemoryStore::default();

        let candidate = engine(&config, &source, &tracker, &store)
            .with_ranker(&TitleMatchRanker)
            .select(None)
            .await
            .unwrap();

        assert_eq!(candidate.post.id, "pets");
        assert_eq!(candidate.similarity, Some(1.0));
        assert_eq!(
            source.calls(),
            vec![Call::Listing("AskReddit".to_string(), SortOrder::Hot, 50)]
        );
        assert_eq!(*tracker.seen_scores.borrow(), vec![Some(vec![1.0, 0.0])]);
    }

    #[tokio::test]
    async fn test_relevance_without_ranker_is_an_error() {
        let config = SelectionConfig {
            relevance: Some(RelevanceConfig {
                keywords: vec!["cats".to_string()],
                model_dir: "unused".into(),
            }),
            ..SelectionConfig::default()
        };
        let source = FakeSource::default();
        let tracker = ScriptedTracker::default();
        let store = MemoryStore::default();

        let err = engine(&config, &source, &tracker, &store)
            .select(None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_restarts_until_tracker_finds_a_thread() {
        let config = SelectionConfig::default();
        let source = FakeSource::default();
        let mut answers = vec![None; 5];
        answers.push(Some(thread("sixth", 10, 40)));
        let tracker = ScriptedTracker::new(answers);
        let store = MemoryStore::default();

        let candidate = engine(&config, &source, &tracker, &store)
            .select(None)
            .await
            .unwrap();

        assert_eq!(candidate.post.id, "sixth");
        assert_eq!(tracker.call_count(), 6);
        assert_eq!(source.listing_calls(), 6);
    }

    #[tokio::test]
    async fn test_attempts_are_bounded() {
        let config = SelectionConfig {
            max_attempts: 3,
            ..SelectionConfig::default()
        };
        let source = FakeSource::default();
        let tracker = ScriptedTracker::default();
        let store = MemoryStore::default();

        let err = engine(&config, &source, &tracker, &store)
            .select(None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Selection(SelectionError::AttemptsExhausted { attempts: 3 })
        ));
        assert_eq!(source.listing_calls(), 3);
    }

    #[tokio::test]
    async fn test_threads_below_min_upvotes_are_skipped() {
        let config = SelectionConfig {
            min_upvotes: 100,
            ..SelectionConfig::default()
        };
        let source = FakeSource::default();
        let tracker = ScriptedTracker::new(vec![
            Some(thread("low", 99, 40)),
            Some(thread("negative", -4, 40)),
            Some(thread("ok", 100, 40)),
        ]);
        let store = MemoryStore::default();

        let candidate = engine(&config, &source, &tracker, &store)
            .select(None)
            .await
            .unwrap();
        assert_eq!(candidate.post.id, "ok");
        assert_eq!(tracker.call_count(), 3);
    }

    #[tokio::test]
    async fn test_direct_reference_below_min_upvotes_is_rejected() {
        let config = SelectionConfig {
            min_upvotes: 10,
            ..SelectionConfig::default()
        };
        let source = FakeSource {
            by_id: HashMap::from([("weak".to_string(), thread("weak", 3, 40))]),
            ..FakeSource::default()
        };
        let tracker = ScriptedTracker::default();
        let store = MemoryStore::default();

        let err = engine(&config, &source, &tracker, &store)
            .select(Some("weak"))
            .await
            .unwrap_err();

        match err {
            CoreError::Selection(SelectionError::DirectThreadRejected {
                thread_id,
                score,
                minimum,
            }) => {
                assert_eq!(thread_id, "weak");
                assert_eq!(score, 3);
                assert_eq!(minimum, 10);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_thread_without_comments_ends_the_run() {
        let config = SelectionConfig::default();
        let source = FakeSource::default();
        let tracker = ScriptedTracker::new(vec![Some(thread("silent", 500, 0))]);
        let store = MemoryStore::default();

        let err = engine(&config, &source, &tracker, &store)
            .run(None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Selection(SelectionError::NoComments { ref thread_id }) if thread_id == "silent"
        ));
        assert_eq!(tracker.call_count(), 1);
        assert!(!source
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Replies(_))));
    }

    #[tokio::test]
    async fn test_story_mode_accepts_threads_without_comments() {
        let config = story_config(NarrationMode::Raw);
        let mut story = thread("story", 10, 0);
        story.selftext = "Once upon a time something happened to me.".to_string();
        let source = FakeSource::default();
        let tracker = ScriptedTracker::new(vec![Some(story)]);
        let store = MemoryStore::default();

        let payload = engine(&config, &source, &tracker, &store)
            .run(None)
            .await
            .unwrap();
        assert_eq!(
            payload.story(),
            Some(&StoryText::Raw(
                "Once upon a time something happened to me.".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_processed_search_result_restarts_selection() {
        let config = SelectionConfig::default();
        let source = FakeSource::default();
        let tracker = ScriptedTracker::new(vec![
            Some(thread("done", 10, 40)),
            Some(thread("fresh", 10, 40)),
        ]);
        let store = MemoryStore::with(&["done"]);

        let candidate = engine(&config, &source, &tracker, &store)
            .select(None)
            .await
            .unwrap();
        assert_eq!(candidate.post.id, "fresh");
    }

    #[tokio::test]
    async fn test_processed_direct_reference_is_used_anyway() {
        let source = FakeSource {
            by_id: HashMap::from([("done".to_string(), thread("done", 10, 40))]),
            ..FakeSource::default()
        };
        let config = SelectionConfig::default();
        let tracker = ScriptedTracker::default();
        let store = MemoryStore::with(&["done"]);

        let candidate = engine(&config, &source, &tracker, &store)
            .select(Some("done"))
            .await
            .unwrap();
        assert_eq!(candidate.post.id, "done");
    }

    #[tokio::test]
    async fn test_comment_payload_filters_replies() {
        let config = SelectionConfig {
            comment_length: 5..=50,
            min_comment_upvotes: 0,
            ..SelectionConfig::default()
        };
        let source = FakeSource {
            by_id: HashMap::from([("abc123".to_string(), thread("abc123", 50, 3))]),
            replies: HashMap::from([(
                "abc123".to_string(),
                vec![
                    reply("c0", "ten chars!", 5),
                    reply("c1", "ten chars!", -1),
                    reply("c2", &"z".repeat(500), 5),
                ],
            )]),
            ..FakeSource::default()
        };
        let tracker = ScriptedTracker::default();
        let store = MemoryStore::default();

        let payload = engine(&config, &source, &tracker, &store)
            .run(Some("abc123"))
            .await
            .unwrap();

        assert_eq!(payload.thread_id, "abc123");
        assert_eq!(payload.thread_title, "Thread abc123");
        assert_eq!(
            payload.thread_url,
            "https://reddit.com/r/AskReddit/comments/abc123/thread_abc123/"
        );
        assert!(!payload.is_nsfw);
        assert!(payload.story().is_none());
        let ids: Vec<&str> = payload
            .comments()
            .iter()
            .map(|c| c.comment_id.as_str())
            .collect();
        assert_eq!(ids, vec!["c0"]);
    }

    #[tokio::test]
    async fn test_story_payload_modes() {
        let mut post = thread("s1", 10, 0);
        post.selftext = "First line.\nSecond line!".to_string();
        let source = FakeSource::default();

        let raw = build_payload(
            &post,
            &story_config(NarrationMode::Raw),
            &source,
            &SANITIZER,
            &NARRATOR,
        )
        .await
        .unwrap();
        assert!(raw.comments().is_empty());
        assert_eq!(
            raw.content,
            PayloadContent::Story {
                post: StoryText::Raw("First line.\nSecond line!".to_string())
            }
        );

        let narrated = build_payload(
            &post,
            &story_config(NarrationMode::Sentences),
            &source,
            &SANITIZER,
            &NARRATOR,
        )
        .await
        .unwrap();
        assert!(narrated.comments().is_empty());
        assert_eq!(
            narrated.story(),
            Some(&StoryText::Narration(vec![
                "First line.".to_string(),
                "Second line!".to_string()
            ]))
        );
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_payload_json_shape() {
        let post = thread("j1", 10, 2);
        let source = FakeSource {
            replies: HashMap::from([("j1".to_string(), vec![reply("c9", "a fine reply", 3)])]),
            ..FakeSource::default()
        };
        let payload = build_payload(
            &post,
            &SelectionConfig::default(),
            &source,
            &SANITIZER,
            &NARRATOR,
        )
        .await
        .unwrap();

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["mode"], "comments");
        assert_eq!(json["thread_id"], "j1");
        assert_eq!(json["comments"][0]["comment_id"], "c9");
        assert_eq!(json["comments"][0]["comment_body"], "a fine reply");
    }

    #[tokio::test]
    async fn test_undone_tracker_picks_first_eligible_unprocessed() {
        let config = SelectionConfig::default();
        let mut nsfw = thread("nsfw", 10, 100);
        nsfw.over_18 = true;
        let listing = vec![
            thread("done", 10, 100),
            thread("quiet", 10, 5),
            nsfw,
            thread("good", 10, 100),
            thread("later", 10, 100),
        ];
        let source = FakeSource::default();
        let store = MemoryStore::with(&["done"]);
        let tracker = UndoneTracker::new(&store, &source, &config);

        let candidate = tracker
            .first_unprocessed(listing, "AskReddit", Some(vec![0.9, 0.8, 0.7, 0.6, 0.5]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(candidate.post.id, "good");
        assert_eq!(candidate.similarity, Some(0.6));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_undone_tracker_escalates_through_top_windows() {
        let config = SelectionConfig::default();
        let source = FakeSource {
            top: HashMap::from([
                (TimeWindow::Day, vec![thread("done", 10, 100)]),
                (TimeWindow::Month, vec![thread("monthly", 10, 100)]),
            ]),
            ..FakeSource::default()
        };
        let store = MemoryStore::with(&["done"]);
        let tracker = UndoneTracker::new(&store, &source, &config);

        let candidate = tracker
            .first_unprocessed(vec![thread("done", 10, 100)], "AskReddit", Some(vec![0.4]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(candidate.post.id, "monthly");
        assert_eq!(candidate.similarity, None);
        assert_eq!(
            source.calls(),
            vec![
                Call::Top(TimeWindow::Day, 50),
                Call::Top(TimeWindow::Hour, 50),
                Call::Top(TimeWindow::Month, 50),
            ]
        );
    }

    #[tokio::test]
    async fn test_undone_tracker_reports_none_when_everything_is_used() {
        let config = SelectionConfig::default();
        let source = FakeSource::default();
        let store = MemoryStore::default();
        let tracker = UndoneTracker::new(&store, &source, &config);

        let found = tracker
            .first_unprocessed(Vec::new(), "AskReddit", None)
            .await
            .unwrap();

        assert!(found.is_none());
        let windows: Vec<TimeWindow> = source
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Top(window, _) => Some(window),
                _ => None,
            })
            .collect();
        assert_eq!(
            windows,
            vec![
                TimeWindow::Day,
                TimeWindow::Hour,
                TimeWindow::Month,
                TimeWindow::Week,
                TimeWindow::Year,
                TimeWindow::All,
            ]
        );
    }

    #[tokio::test]
    async fn test_engine_with_undone_tracker_end_to_end() {
        let config = SelectionConfig {
            min_upvotes: 10,
            ..SelectionConfig::default()
        };
        let source = FakeSource {
            listing: vec![
                thread("used", 500, 100),
                thread("picked", 42, 100),
            ],
            replies: HashMap::from([(
                "picked".to_string(),
                vec![reply("r1", "Great question", 8), CommentNode::More { count: 12 }],
            )]),
            ..FakeSource::default()
        };
        let store = MemoryStore::with(&["used"]);
        let tracker = UndoneTracker::new(&store, &source, &config);

        let payload = engine(&config, &source, &tracker, &store)
            .run(None)
            .await
            .unwrap();

        assert_eq!(payload.thread_id, "picked");
        assert_eq!(payload.comments().len(), 1);
        assert_eq!(payload.comments()[0].comment_id, "r1");
    }

    #[test]
    fn test_resolve_configured_subreddit() {
        let input = ScriptedInput::new(&[]);
        let name = resolve_subreddit(Some("rust+programming"), &input).unwrap();
        assert_eq!(name, "rust+programming");
        assert!(input.asked.borrow().is_empty());
    }

    #[test]
    fn test_resolve_prompted_subreddit() {
        let input = ScriptedInput::new(&["r/Python"]);
        assert_eq!(resolve_subreddit(None, &input).unwrap(), "Python");
        assert_eq!(input.asked.borrow().len(), 1);

        let empty = ScriptedInput::new(&[""]);
        assert_eq!(resolve_subreddit(None, &empty).unwrap(), "askreddit");
    }

    #[test]
    fn test_two_factor_code() {
        let input = ScriptedInput::new(&["123456"]);
        assert_eq!(two_factor_code(&input).unwrap(), "123456");

        let empty = ScriptedInput::new(&[]);
        assert!(matches!(
            two_factor_code(&empty),
            Err(CoreError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_missing_direct_thread_propagates_lookup_error() {
        let config = SelectionConfig {
            post_ids: vec!["gone".to_string()],
            ..SelectionConfig::default()
        };
        let source = FakeSource::default();
        let tracker = ScriptedTracker::default();
        let store = MemoryStore::default();

        let result = tokio_test::block_on(engine(&config, &source, &tracker, &store).run(None));

        assert!(matches!(
            result,
            Err(CoreError::RedditApi(RedditApiError::PostNotFound { .. }))
        ));
        assert_eq!(source.calls(), vec![Call::ById("gone".to_string())]);
        assert_eq!(tracker.call_count(), 0);
    }
}
