//! Browser page served at `/`.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>AI Alt Text Studio</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
            display: flex;
            align-items: center;
            justify-content: center;
            padding: 20px;
        }

        .container {
            background: white;
            border-radius: 20px;
            box-shadow: 0 20px 60px rgba(0,0,0,0.3);
            max-width: 800px;
            width: 100%;
            padding: 40px;
        }

        h1 {
            color: #333;
            margin-bottom: 10px;
            font-size: 2em;
        }

        .subtitle {
            color: #666;
            margin-bottom: 30px;
            font-size: 0.9em;
        }

        .tabs {
            display: flex;
            gap: 10px;
            margin-bottom: 20px;
        }

        .tab {
            flex: 1;
            padding: 12px;
            border: 2px solid #667eea;
            border-radius: 10px;
            background: white;
            color: #667eea;
            font-weight: 600;
            cursor: pointer;
        }

        .tab.active {
            background: #667eea;
            color: white;
        }

        .upload-area {
            border: 3px dashed #667eea;
            border-radius: 15px;
            padding: 60px 20px;
            text-align: center;
            cursor: pointer;
            transition: all 0.3s;
            background: #f8f9ff;
        }

        .upload-area.dragover {
            border-color: #764ba2;
            background: #e8ebff;
        }

        .upload-text {
            color: #667eea;
            font-size: 1.2em;
            font-weight: 600;
            margin-bottom: 10px;
        }

        .upload-hint {
            color: #999;
            font-size: 0.9em;
        }

        input[type="file"] {
            display: none;
        }

        textarea {
            width: 100%;
            min-height: 100px;
            border: 2px solid #667eea;
            border-radius: 10px;
            padding: 12px;
            font: inherit;
        }

        button.primary {
            margin-top: 12px;
            padding: 12px 24px;
            border: none;
            border-radius: 10px;
            background: #667eea;
            color: white;
            font-weight: 600;
            cursor: pointer;
        }

        button.primary:disabled {
            opacity: 0.5;
            cursor: default;
        }

        .preview-image {
            max-width: 100%;
            border-radius: 10px;
            margin: 20px 0;
            box-shadow: 0 4px 15px rgba(0,0,0,0.1);
        }

        .result {
            background: #f8f9ff;
            border-radius: 10px;
            padding: 20px;
            margin-top: 20px;
        }

        .result-label {
            color: #667eea;
            font-weight: 600;
            margin: 10px 0;
            font-size: 0.9em;
            text-transform: uppercase;
            letter-spacing: 1px;
        }

        .result-text {
            color: #333;
            font-size: 1.1em;
            line-height: 1.6;
        }

        pre.snippet {
            background: #272822;
            color: #f8f8f2;
            padding: 15px;
            border-radius: 10px;
            white-space: pre-wrap;
            word-break: break-all;
            font-size: 0.85em;
        }

        .loading {
            text-align: center;
            padding: 40px;
        }

        .spinner {
            border: 4px solid #f3f3f3;
            border-top: 4px solid #667eea;
            border-radius: 50%;
            width: 50px;
            height: 50px;
            animation: spin 1s linear infinite;
            margin: 0 auto 20px;
        }

        @keyframes spin {
            0% { transform: rotate(0deg); }
            100% { transform: rotate(360deg); }
        }

        .error {
            background: #fee;
            border: 2px solid #fcc;
            color: #c33;
            padding: 15px;
            border-radius: 10px;
            margin-top: 20px;
        }

        .hidden {
            display: none;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>AI Alt Text Studio</h1>
        <p class="subtitle">Describe an image for accessible markup, or create one from a prompt.</p>

        <div class="tabs">
            <button class="tab active" id="describeTab">Describe an image</button>
            <button class="tab" id="createTab">Create an image</button>
        </div>

        <section id="describePanel">
            <div class="upload-area" id="uploadArea">
                <div class="upload-text">Click or drag image here</div>
                <div class="upload-hint">JPG, PNG, GIF, WebP &bull; Max 10MB</div>
                <input type="file" id="fileInput" accept="image/*">
            </div>
        </section>

        <section id="createPanel" class="hidden">
            <textarea id="promptInput" placeholder="A watercolor fox sleeping in fresh snow"></textarea>
            <button class="primary" id="generateButton">Generate</button>
        </section>

        <div class="loading hidden" id="loading">
            <div class="spinner"></div>
            <p id="loadingText">Working...</p>
        </div>

        <div class="error hidden" id="error"></div>

        <img id="previewImage" class="preview-image hidden" alt="">

        <div class="result hidden" id="analysisResult">
            <div class="result-label">Alt text</div>
            <div class="result-text" id="altText"></div>
            <div class="result-label">Caption</div>
            <div class="result-text" id="captionText"></div>
            <div class="result-label">HTML snippet</div>
            <pre class="snippet" id="snippet"></pre>
            <button class="primary" id="copyButton">Copy HTML</button>
        </div>
    </div>

    <script>
        const el = (id) => document.getElementById(id);
        const state = {
            mode: 'describe',
            busy: false,
            error: null,
            analysis: null,
            imageUrl: null,
            copied: false,
        };

        function render() {
            el('describeTab').classList.toggle('active', state.mode === 'describe');
            el('createTab').classList.toggle('active', state.mode === 'create');
            el('describePanel').classList.toggle('hidden', state.mode !== 'describe' || state.busy);
            el('createPanel').classList.toggle('hidden', state.mode !== 'create');
            el('generateButton').disabled = state.busy;
            el('loading').classList.toggle('hidden', !state.busy);
            el('error').classList.toggle('hidden', !state.error);
            el('error').textContent = state.error ? 'Error: ' + state.error : '';
            el('previewImage').classList.toggle('hidden', !state.imageUrl);
            if (state.imageUrl) {
                el('previewImage').src = state.imageUrl;
                el('previewImage').alt = state.analysis ? state.analysis.altText : '';
            }
            el('analysisResult').classList.toggle('hidden', !state.analysis);
            if (state.analysis) {
                el('altText').textContent = state.analysis.altText;
                el('captionText').textContent = state.analysis.caption;
                el('snippet').textContent = state.analysis.figureHtml || '';
            }
            el('copyButton').textContent = state.copied ? 'Copied!' : 'Copy HTML';
        }

        function reset(mode) {
            if (state.imageUrl) URL.revokeObjectURL(state.imageUrl);
            Object.assign(state, { mode, busy: false, error: null, analysis: null, imageUrl: null, copied: false });
            render();
        }

        async function errorMessage(response) {
            try {
                const body = await response.json();
                return body.error || response.statusText;
            } catch (_) {
                return response.statusText;
            }
        }

        async function describe(file) {
            reset('describe');
            state.busy = true;
            state.imageUrl = URL.createObjectURL(file);
            el('loadingText').textContent = 'Writing alt text...';
            render();

            const form = new FormData();
            form.append('image', file);
            try {
                const response = await fetch('/api/analyze', { method: 'POST', body: form });
                if (!response.ok) throw new Error(await errorMessage(response));
                state.analysis = await response.json();
            } catch (err) {
                state.error = err.message;
            }
            state.busy = false;
            render();
        }

        async function create() {
            const prompt = el('promptInput').value.trim();
            if (!prompt) {
                state.error = 'Prompt is required';
                render();
                return;
            }
            reset('create');
            state.busy = true;
            el('loadingText').textContent = 'Generating image...';
            render();

            try {
                const response = await fetch('/api/generate', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ prompt }),
                });
                if (!response.ok) throw new Error(await errorMessage(response));
                state.imageUrl = URL.createObjectURL(await response.blob());
            } catch (err) {
                state.error = err.message;
            }
            state.busy = false;
            render();
        }

        const uploadArea = el('uploadArea');
        const fileInput = el('fileInput');

        uploadArea.addEventListener('click', () => fileInput.click());
        uploadArea.addEventListener('dragover', (e) => {
            e.preventDefault();
            uploadArea.classList.add('dragover');
        });
        uploadArea.addEventListener('dragleave', () => uploadArea.classList.remove('dragover'));
        uploadArea.addEventListener('drop', (e) => {
            e.preventDefault();
            uploadArea.classList.remove('dragover');
            const file = e.dataTransfer.files[0];
            if (file && file.type.startsWith('image/')) describe(file);
        });
        fileInput.addEventListener('change', (e) => {
            const file = e.target.files[0];
            if (file) describe(file);
            fileInput.value = '';
        });

        el('describeTab').addEventListener('click', () => reset('describe'));
        el('createTab').addEventListener('click', () => reset('create'));
        el('generateButton').addEventListener('click', create);
        el('copyButton').addEventListener('click', async () => {
            if (!state.analysis) return;
            await navigator.clipboard.writeText(state.analysis.figureHtml || '');
            state.copied = true;
            render();
            setTimeout(() => { state.copied = false; render(); }, 2000);
        });

        render();
    </script>
</body>
</html>
"#;
