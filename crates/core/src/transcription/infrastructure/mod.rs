pub mod openai_recognizer;
