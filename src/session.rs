use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::{CandidateEngine, FilterState, SortKey};
use crate::source::{CandidateSource, ChangeEvent, FetchError};
use crate::CandidateRecord;

/// 外部ストアのスナップショットを保持するセッション
///
/// 生データはセッション開始時（と変更通知時）に全量取得し、正準集合を
/// 作り直して一括差し替えする。途中状態が見えることはない。
/// 取得に失敗した場合は直前のスナップショットを保持し続ける（stale-but-valid）
pub struct CandidateSession<S> {
    source: S,
    engine: RwLock<Arc<CandidateEngine>>,
    generation: AtomicU64,
}

impl<S: CandidateSource> CandidateSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            engine: RwLock::new(Arc::new(CandidateEngine::default())),
            generation: AtomicU64::new(0),
        }
    }

    /// 3 クエリを並行発行し、完成した正準集合を swap-on-completion で差し替える
    ///
    /// 実行中に新しい refresh が始まっていた場合、この呼び出しの結果は
    /// マージせず破棄する（last-write-wins）。部分的な書き込みはしない
    pub async fn refresh(&self) -> Result<(), FetchError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let (candidates, tags, scouts) = tokio::join!(
            self.source.fetch_candidates(),
            self.source.fetch_job_type_tags(),
            self.source.fetch_scouts(),
        );

        let (candidates, tags, scouts) = match (candidates, tags, scouts) {
            (Ok(candidates), Ok(tags), Ok(scouts)) => (candidates, tags, scouts),
            (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => {
                warn!(error = %err, "refresh failed; keeping previous snapshot");
                return Err(err);
            }
        };

        let engine = CandidateEngine::build(&candidates, &tags, &scouts, Utc::now());

        let mut guard = self.engine.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding superseded refresh result");
            return Ok(());
        }
        info!(candidates = engine.len(), "snapshot refreshed");
        *guard = Arc::new(engine);
        Ok(())
    }

    /// 現在のフィルタ状態・並び替えキーで問い合わせる。
    /// フィルタ変更のたびに呼び直してよい（正準集合はメモ化済み）
    pub async fn results(&self, state: &FilterState, sort_key: SortKey) -> Vec<CandidateRecord> {
        self.engine.read().await.query(state, sort_key)
    }

    /// 現在の正準スナップショットへの参照
    pub async fn snapshot(&self) -> Arc<CandidateEngine> {
        Arc::clone(&*self.engine.read().await)
    }

    /// 変更通知チャネルを購読し、通知のたびに全量再取得を走らせるタスクを張る
    ///
    /// バースト通知は次の再取得前にまとめて吸収し、1 回のパイプライン実行へ
    /// 合流させる。返り値の Subscription を drop / cancel すると購読を解除する
    pub fn watch(self: Arc<Self>, mut events: mpsc::Receiver<ChangeEvent>) -> Subscription {
        let handle = tokio::spawn(async move {
            while events.recv().await.is_some() {
                // 既に溜まっている通知は 1 回の再取得へ合流
                while events.try_recv().is_ok() {}
                if let Err(err) = self.refresh().await {
                    warn!(error = %err, "change-triggered refresh failed");
                }
            }
        });
        Subscription { handle }
    }
}

/// 変更通知購読の解除トークン。drop でも解除される
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn cancel(self) {
        self.handle.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
