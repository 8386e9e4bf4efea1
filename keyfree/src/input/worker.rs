//! 输入工作线程
//!
//! 键盘句柄（enigo）由一个专用线程独占持有，异步请求通过通道提交命令并等待结果。
//! 这样 `down` 与后续 `up` 作用在同一个键盘句柄上，且并发请求的按键事件按到达顺序串行执行。

use std::sync::mpsc;
use std::thread;

use tokio::sync::oneshot;

use super::dispatcher::InputDispatcher;
use super::error::{InputError, InputResult};
use super::keyboard::KeyInjector;

/// 输入命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// 单键
    Single(String),
    /// 组合键（1-4 个按键）
    Chord(Vec<String>),
    /// 按下
    Down(String),
    /// 释放
    Up(String),
    /// 输入文本
    Text(String),
}

type Job = (InputCommand, oneshot::Sender<InputResult<()>>);

/// 输入工作线程句柄
///
/// 可克隆；所有克隆共享同一个工作线程。最后一个句柄释放后线程退出。
#[derive(Clone)]
pub struct InputWorker {
    sender: mpsc::Sender<Job>,
}

impl InputWorker {
    /// 启动工作线程
    ///
    /// `factory` 在工作线程内调用以创建注入器；创建失败时每个命令都会收到该错误
    ///
    /// # Errors
    ///
    /// 线程创建失败时返回 `InputError::WorkerUnavailable`
    pub fn spawn<I, F>(factory: F) -> InputResult<Self>
    where
        I: KeyInjector + 'static,
        F: FnOnce() -> InputResult<I> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<Job>();

        thread::Builder::new()
            .name("keyfree-input".to_string())
            .spawn(move || {
                let mut dispatcher = match factory() {
                    Ok(injector) => {
                        tracing::info!("Input worker started");
                        Ok(InputDispatcher::new(injector))
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Keyboard backend unavailable");
                        Err(e)
                    }
                };

                while let Ok((command, reply)) = receiver.recv() {
                    let result = match dispatcher.as_mut() {
                        Ok(dispatcher) => execute(dispatcher, &command),
                        Err(e) => Err(e.clone()),
                    };
                    // 请求方可能已断开
                    let _ = reply.send(result);
                }

                tracing::debug!("Input worker stopped");
            })
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to spawn input worker");
                InputError::WorkerUnavailable
            })?;

        Ok(Self { sender })
    }

    /// 提交命令并等待执行结果
    pub async fn execute(&self, command: InputCommand) -> InputResult<()> {
        let (reply, result) = oneshot::channel();

        self.sender
            .send((command, reply))
            .map_err(|_| InputError::WorkerUnavailable)?;

        result.await.map_err(|_| InputError::WorkerUnavailable)?
    }
}

fn execute<I: KeyInjector>(dispatcher: &mut InputDispatcher<I>, command: &InputCommand) -> InputResult<()> {
    match command {
        InputCommand::Single(key) => dispatcher.single(key),
        InputCommand::Chord(keys) => dispatcher.chord(keys),
        InputCommand::Down(key) => dispatcher.down(key),
        InputCommand::Up(key) => dispatcher.up(key),
        InputCommand::Text(text) => dispatcher.type_string(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keymap::CanonicalKey;
    use crate::test_support::{KeyEvent, RecordingInjector};

    #[tokio::test]
    async fn test_worker_executes_commands_in_order() {
        let recorder = RecordingInjector::new();
        let injector = recorder.clone();
        let worker = InputWorker::spawn(move || Ok(injector)).unwrap();

        worker.execute(InputCommand::Down("a".to_string())).await.unwrap();
        worker.execute(InputCommand::Up("a".to_string())).await.unwrap();

        let a = CanonicalKey::Character('a');
        assert_eq!(recorder.events(), vec![KeyEvent::Press(a), KeyEvent::Release(a)]);
    }

    #[tokio::test]
    async fn test_worker_reports_backend_init_failure() {
        let worker = InputWorker::spawn(|| -> InputResult<RecordingInjector> {
            Err(InputError::KeyboardSimulationFailed("no display".to_string()))
        })
        .unwrap();

        let err = worker.execute(InputCommand::Single("a".to_string())).await.unwrap_err();
        assert_eq!(err, InputError::KeyboardSimulationFailed("no display".to_string()));

        // 后续命令仍然得到同样的错误
        let err = worker.execute(InputCommand::Text("x".to_string())).await.unwrap_err();
        assert!(matches!(err, InputError::KeyboardSimulationFailed(_)));
    }

    #[tokio::test]
    async fn test_worker_propagates_dispatch_errors() {
        let worker = InputWorker::spawn(|| Ok(RecordingInjector::new())).unwrap();

        let err = worker
            .execute(InputCommand::Chord(vec!["ctrl".to_string(), "bogus".to_string()]))
            .await
            .unwrap_err();

        assert_eq!(err, InputError::InvalidKeys(vec!["bogus".to_string()]));
    }
}
